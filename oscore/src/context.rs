//! Security context derivation (§4.5) and the three context types (§3).
//!
//! Contexts are explicit, caller-held handles rather than process-wide
//! globals (§9 "Global mutable context state"): a host passes
//! `&CommonContext`/`&mut SenderContext`/`&mut RecipientContext` into
//! [`crate::protect::protect`]/[`crate::unprotect::unprotect`], so one
//! process can run any number of concurrent endpoints.

use std_alloc::vec::Vec;

use crate::config::Config;
use crate::error::{EncodingError, Error};
use crate::hkdf;
use crate::hkdf_info::{DerivationType, Info};
use crate::replay::BitmapReplayWindow;
use crate::seqnum::SeqNum;

const COMMON_IV_LEN: usize = 13;

/// Pre-established material (§3): the immutable input every context is
/// derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreEstablished<'a> {
  /// The shared master secret. `(master_secret, master_salt, sender_id)`
  /// must be globally unique across all deployments.
  pub master_secret: &'a [u8],
  /// The shared master salt. Empty is a valid default.
  pub master_salt: &'a [u8],
  /// This endpoint's Sender ID.
  pub sender_id: &'a [u8],
  /// The peer's Sender ID, i.e. this endpoint's Recipient ID.
  pub recipient_id: &'a [u8],
  /// The shared ID Context, if negotiated out of band.
  pub id_context: Option<&'a [u8]>,
  /// Algorithm selection and replay-window sizing.
  pub config: Config,
}

/// `{aead_alg, kdf, master_secret, master_salt, id_context, common_iv}`
/// (§3). Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonContext {
  /// See [`Config::aead_alg`].
  pub aead_alg: crate::config::AeadAlg,
  /// See [`Config::kdf`].
  pub kdf: crate::config::Kdf,
  /// Copy of the pre-established master secret.
  pub master_secret: Vec<u8>,
  /// Copy of the pre-established master salt.
  pub master_salt: Vec<u8>,
  /// Copy of the pre-established ID Context, if any.
  pub id_context: Option<Vec<u8>>,
  /// The 13-byte derived Common IV.
  pub common_iv: [u8; COMMON_IV_LEN],
}

/// Durable storage for the sender sequence number (§3: "the only mutable
/// field in the data model and must survive process restarts").
pub trait SeqNumStore {
  /// Load the last-persisted sequence number, or zero if none was ever
  /// stored.
  fn load(&self) -> SeqNum;

  /// Persist `value`. Must complete before any bytes protected with the
  /// paired nonce leave the process (§4.11 step 2).
  fn store(&self, value: SeqNum);
}

/// An in-memory, process-lifetime [`SeqNumStore`] suitable for tests and
/// single-process deployments that accept losing sequence-number state on
/// crash.
#[cfg(feature = "std")]
#[derive(Debug, Default)]
pub struct AtomicSeqNumStore(std::sync::atomic::AtomicU64);

#[cfg(feature = "std")]
impl AtomicSeqNumStore {
  /// A store starting at sequence number zero.
  pub fn new() -> Self {
    Self(std::sync::atomic::AtomicU64::new(0))
  }
}

#[cfg(feature = "std")]
impl SeqNumStore for AtomicSeqNumStore {
  fn load(&self) -> SeqNum {
    let packed = self.0.load(std::sync::atomic::Ordering::SeqCst);
    let full = packed.to_be_bytes();
    let mut out = [0u8; crate::seqnum::SEQ_NUM_LEN];
    out.copy_from_slice(&full[3..8]);
    SeqNum::from_bytes(out)
  }

  fn store(&self, value: SeqNum) {
    let mut full = [0u8; 8];
    full[3..8].copy_from_slice(value.bytes());
    self.0.store(u64::from_be_bytes(full), std::sync::atomic::Ordering::SeqCst);
  }
}

/// `{sender_id, sender_key, sender_seq_num}` (§3).
#[derive(Debug)]
pub struct SenderContext<S: SeqNumStore = AtomicSeqNumStore> {
  /// This endpoint's Sender ID, echoed into every OSCORE option this
  /// context produces.
  pub sender_id: Vec<u8>,
  /// The 16-byte derived Sender Key.
  pub sender_key: [u8; 16],
  /// The durable sequence-number backing store.
  pub seq: S,
}

/// `{recipient_id, recipient_key, replay_window}` (§3).
#[derive(Debug)]
pub struct RecipientContext<R: crate::replay::ReplayWindow = BitmapReplayWindow<32>> {
  /// The peer's Sender ID, matched against inbound OSCORE options' `kid`.
  pub recipient_id: Vec<u8>,
  /// The 16-byte derived Recipient Key.
  pub recipient_key: [u8; 16],
  /// The replay window tracking recently observed Partial IVs.
  pub replay_window: R,
}

fn derive_into(pre: &PreEstablished<'_>, id: &[u8], ty: DerivationType, out: &mut [u8]) -> Result<(), EncodingError> {
  let info = Info { id, id_context: pre.id_context, aead_alg: pre.config.aead_alg.cose_id(), ty, length: out.len() as i64 };
  hkdf::derive(pre.master_salt, pre.master_secret, &info, out)
}

/// Derive the Common Context: `common_iv` from `id = empty`, `type = IV`,
/// output length 13 (§4.5).
pub fn derive_common_context(pre: &PreEstablished<'_>) -> Result<CommonContext, Error> {
  log::debug!("deriving common context (id_context present: {})", pre.id_context.is_some());

  let mut common_iv = [0u8; COMMON_IV_LEN];
  derive_into(pre, &[], DerivationType::Iv, &mut common_iv)?;

  Ok(CommonContext { aead_alg: pre.config.aead_alg,
                      kdf: pre.config.kdf,
                      master_secret: pre.master_secret.to_vec(),
                      master_salt: pre.master_salt.to_vec(),
                      id_context: pre.id_context.map(<[u8]>::to_vec),
                      common_iv })
}

/// Derive the Sender Context: `sender_key` from `id = sender_id`, `type =
/// Key`, output length 16; the sequence number store starts at whatever it
/// was last persisted as (§4.5).
pub fn derive_sender_context<S: SeqNumStore + Default>(pre: &PreEstablished<'_>) -> Result<SenderContext<S>, Error> {
  log::debug!("deriving sender context for sender_id len={}", pre.sender_id.len());

  let mut sender_key = [0u8; 16];
  derive_into(pre, pre.sender_id, DerivationType::Key, &mut sender_key)?;

  Ok(SenderContext { sender_id: pre.sender_id.to_vec(), sender_key, seq: S::default() })
}

/// Derive the Recipient Context: `recipient_key` from `id = recipient_id`,
/// `type = Key`, output length 16 (§4.5).
pub fn derive_recipient_context<R: crate::replay::ReplayWindow + Default>(pre: &PreEstablished<'_>)
                                                                           -> Result<RecipientContext<R>, Error> {
  log::debug!("deriving recipient context for recipient_id len={}", pre.recipient_id.len());

  let mut recipient_key = [0u8; 16];
  derive_into(pre, pre.recipient_id, DerivationType::Key, &mut recipient_key)?;

  Ok(RecipientContext { recipient_id: pre.recipient_id.to_vec(), recipient_key, replay_window: R::default() })
}
