//! The `ReplayWindow` contract (§3/§9 open question) and a concrete
//! fixed-size sliding-bitmap implementation, the way `toad_common` leaves a
//! collection trait abstract but ships one concrete implementation callers
//! can reach for directly.
//!
//! §9 leaves window policy to the implementer; [`BitmapReplayWindow`]
//! resolves that by tracking the highest Partial IV seen plus a bitmap of
//! the `N` PIVs immediately below it (documented in `DESIGN.md`).

/// At-most-once acceptance of inbound Partial IVs.
///
/// `accepts` must not mutate state — the unprotect pipeline (§4.12 step 3)
/// checks acceptance *before* decrypting, and only calls `insert` after the
/// AEAD tag verifies, so a replayed-but-unverified message never corrupts
/// the window.
pub trait ReplayWindow {
  /// Whether `piv` (trimmed, big-endian) would be accepted right now.
  fn accepts(&self, piv: &[u8]) -> bool;

  /// Record `piv` as seen. Only called after successful decryption.
  fn insert(&mut self, piv: &[u8]);
}

fn be_bytes_to_u64(bytes: &[u8]) -> u64 {
  bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64)
}

/// A sliding window over the highest `N` Partial IVs below (and including)
/// the highest one ever seen. `N` is capped at 64 by the backing bitmap;
/// §4.15's documented default is 32.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapReplayWindow<const N: usize> {
  highest: Option<u64>,
  bitmap: u64,
}

impl<const N: usize> BitmapReplayWindow<N> {
  /// An empty window that has not yet seen any Partial IV.
  pub fn new() -> Self {
    Self { highest: None, bitmap: 0 }
  }
}

impl<const N: usize> Default for BitmapReplayWindow<N> {
  fn default() -> Self {
    Self::new()
  }
}

impl<const N: usize> ReplayWindow for BitmapReplayWindow<N> {
  fn accepts(&self, piv: &[u8]) -> bool {
    let seq = be_bytes_to_u64(piv);

    match self.highest {
      | None => true,
      | Some(h) if seq > h => true,
      | Some(h) => {
        let diff = h - seq;
        diff < N as u64 && self.bitmap & (1 << diff) == 0
      },
    }
  }

  fn insert(&mut self, piv: &[u8]) {
    let seq = be_bytes_to_u64(piv);

    match self.highest {
      | None => {
        self.highest = Some(seq);
        self.bitmap = 1;
      },
      | Some(h) if seq > h => {
        let shift = seq - h;
        self.bitmap = if shift >= 64 { 0 } else { self.bitmap << shift };
        self.bitmap |= 1;
        self.highest = Some(seq);
      },
      | Some(h) => {
        let diff = h - seq;
        if diff < N as u64 {
          self.bitmap |= 1 << diff;
        }
      },
    }
  }
}
