//! The OSCORE option's compact, bit-packed wire value (§4.8):
//!
//! ```text
//! byte 0:   0 0 0 h k n n n
//! bytes 1..n:      Partial IV (PIV), big-endian, trimmed
//! (if h)    1 byte s = |kid_context|
//!           s bytes kid_context
//! remainder:       kid (may be empty when k=1)
//! ```

use core::fmt;

use crate::buf::{Cursor, Sink};
use crate::error::EncodingError;

const FLAG_H: u8 = 0b0001_0000;
const FLAG_K: u8 = 0b0000_1000;
const MASK_N: u8 = 0b0000_0111;

/// Errors specific to encoding an [`UnprotectedOscoreOption`], extending
/// [`EncodingError`] with the one OSCORE-option-specific semantic rule: a
/// response must never carry a `kid_context`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OscoreOptionError {
  /// See [`EncodingError`]
  Encoding(EncodingError),
  /// A response tried to encode a `kid_context`, which responses MUST omit.
  KidContextError,
}

impl From<EncodingError> for OscoreOptionError {
  fn from(e: EncodingError) -> Self {
    Self::Encoding(e)
  }
}

impl fmt::Display for OscoreOptionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::Encoding(e) => write!(f, "{e}"),
      | Self::KidContextError => write!(f, "responses must not carry a kid context"),
    }
  }
}

#[cfg(feature = "std")]
impl std::error::Error for OscoreOptionError {}

/// The decoded value of an OSCORE option (§3 "Unprotected OSCORE option
/// value").
///
/// `kid` and `kid_context` are `Option`s rather than possibly-empty slices
/// so that "present and empty" (`k=1`, zero-length kid) stays distinguishable
/// from "absent" (`k=0`) — the whole point of the flag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnprotectedOscoreOption<'a> {
  /// The trimmed Partial IV, 0–5 bytes.
  pub partial_iv: &'a [u8],
  /// The Sender ID of the endpoint that produced this option, if present.
  pub kid: Option<&'a [u8]>,
  /// The ID Context, if present. Responses MUST NOT carry one.
  pub kid_context: Option<&'a [u8]>,
}

impl<'a> UnprotectedOscoreOption<'a> {
  /// Build and validate an unprotected OSCORE option value.
  ///
  /// Checks the invariants from §3/§4.8: `partial_iv` is at most 5 bytes and
  /// has no un-trimmed leading zero (unless it is exactly `[0x00]`), and
  /// `kid_context` (if present) is under 256 bytes.
  pub fn new(partial_iv: &'a [u8], kid: Option<&'a [u8]>, kid_context: Option<&'a [u8]>)
             -> Result<Self, EncodingError> {
    if partial_iv.len() > 5 {
      return Err(EncodingError::InvalidPartialIvLength);
    }

    if partial_iv.len() > 1 && partial_iv[0] == 0 {
      return Err(EncodingError::InvalidIvUntrimmed);
    }

    if kid_context.map(<[u8]>::len).unwrap_or(0) >= 256 {
      return Err(EncodingError::InvalidKidContextLength);
    }

    Ok(Self { partial_iv, kid, kid_context })
  }

  /// Bytes this option value would occupy on the wire (§4.8
  /// `option_value_length`).
  pub fn encoded_len(&self) -> usize {
    1 + self.partial_iv.len()
      + self.kid_context.map(|c| 1 + c.len()).unwrap_or(0)
      + self.kid.map(<[u8]>::len).unwrap_or(0)
  }

  /// Emit this option's wire value into `sink`.
  ///
  /// `for_response` must be `true` when this option is being attached to a
  /// response message; encoding fails with
  /// [`OscoreOptionError::KidContextError`] if a `kid_context` is present in
  /// that case, since responses MUST omit it.
  pub fn encode<S: Sink>(&self, for_response: bool, sink: &mut S) -> Result<(), OscoreOptionError> {
    if for_response && self.kid_context.is_some() {
      return Err(OscoreOptionError::KidContextError);
    }

    let h = self.kid_context.is_some() as u8;
    let k = self.kid.is_some() as u8;
    let n = self.partial_iv.len() as u8;

    sink.push((h * FLAG_H) | (k * FLAG_K) | (n & MASK_N));
    sink.extend(self.partial_iv);

    if let Some(ctx) = self.kid_context {
      sink.push(ctx.len() as u8);
      sink.extend(ctx);
    }

    if let Some(kid) = self.kid {
      sink.extend(kid);
    }

    Ok(())
  }

  /// Decode an OSCORE option value from its wire bytes.
  pub fn decode(bytes: &'a [u8]) -> Result<Self, EncodingError> {
    let mut cursor = Cursor::new(bytes);

    let byte0 = cursor.next().ok_or(EncodingError::InvalidOptionLength)?;
    let h = byte0 & FLAG_H != 0;
    let k = byte0 & FLAG_K != 0;
    let n = byte0 & MASK_N;

    if n >= 8 {
      return Err(EncodingError::InvalidPartialIvLength);
    }

    let partial_iv = cursor.take_exact(n as usize)
                           .ok_or(EncodingError::InvalidOptionLength)?;

    let kid_context = if h {
      let s = cursor.next().ok_or(EncodingError::InvalidOptionLength)? as usize;
      Some(cursor.take_exact(s).ok_or(EncodingError::InvalidOptionLength)?)
    } else {
      None
    };

    let kid = if k {
      Some(cursor.rest())
    } else if cursor.is_exhausted() {
      None
    } else {
      return Err(EncodingError::InvalidOptionLength);
    };

    Ok(Self { partial_iv, kid, kid_context })
  }
}
