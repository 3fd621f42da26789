//! Error kinds for the runtime crate (§7 "Semantic", "Cryptographic" and
//! "Transport adapter" families), plus the top-level [`Error`] that unifies
//! every family this crate can return.
//!
//! `oscore_msg`'s "Encoding" and "Proxy URI" families are reused as-is rather
//! than duplicated, the same way `toad` reuses `toad_msg`'s error enums
//! inside its own broader `Error` rather than re-declaring them.

use core::fmt;

pub use oscore_msg::{EncodingError, UriError};

/// Every "Semantic" family error from §7.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SemanticError {
  /// The message carried no OSCORE option where one was required.
  NoOscoreOption,
  /// The OSCORE option's `kid` did not match the expected Recipient ID.
  InvalidKid,
  /// A response's OSCORE option carried a `kid_context`, which it must not.
  KidContextError,
  /// Decrypted plaintext had trailing bytes with no `0xFF` payload marker.
  PayloadNoPayloadMarker,
  /// A CoAP header's version field was not the expected value.
  InvalidVersion,
  /// A CoAP header's message type was not one this pipeline expects.
  InvalidType,
  /// A CoAP header's token length was out of range.
  InvalidTokenLength,
  /// The 5-byte sender sequence number would wrap past `0xFFFFFFFFFF`.
  SequenceNumberOverflow,
}

impl fmt::Display for SemanticError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::NoOscoreOption => write!(f, "message carries no OSCORE option"),
      | Self::InvalidKid => write!(f, "OSCORE option kid does not match recipient id"),
      | Self::KidContextError => write!(f, "response must not carry a kid context"),
      | Self::PayloadNoPayloadMarker => write!(f, "decrypted plaintext missing payload marker"),
      | Self::InvalidVersion => write!(f, "unexpected CoAP version"),
      | Self::InvalidType => write!(f, "unexpected CoAP message type"),
      | Self::InvalidTokenLength => write!(f, "token length out of range"),
      | Self::SequenceNumberOverflow => write!(f, "sender sequence number overflowed"),
    }
  }
}

#[cfg(feature = "std")]
impl std::error::Error for SemanticError {}

/// Every "Cryptographic" family error from §7.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CryptoError {
  /// The AEAD tag did not verify (or, rarely, Seal itself failed).
  AeadVerifyFailed,
  /// The inbound Partial IV was not accepted by the replay window.
  ReplayRejected,
}

impl fmt::Display for CryptoError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::AeadVerifyFailed => write!(f, "AEAD tag verification failed"),
      | Self::ReplayRejected => write!(f, "partial IV rejected by replay window"),
    }
  }
}

#[cfg(feature = "std")]
impl std::error::Error for CryptoError {}

/// Opaque transport-adapter failure (§7 "Transport adapter"), surfaced by
/// the host's `CoapMessage` collaborator rather than produced by this crate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TransportError(pub &'static str);

impl fmt::Display for TransportError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "transport error: {}", self.0)
  }
}

#[cfg(feature = "std")]
impl std::error::Error for TransportError {}

/// The top-level error returned by every fallible operation in this crate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
  /// See [`EncodingError`]
  Encoding(EncodingError),
  /// See [`SemanticError`]
  Semantic(SemanticError),
  /// See [`CryptoError`]
  Crypto(CryptoError),
  /// See [`UriError`]
  Uri(UriError),
  /// See [`TransportError`]
  Transport(TransportError),
}

impl From<EncodingError> for Error {
  fn from(e: EncodingError) -> Self {
    Self::Encoding(e)
  }
}

impl From<SemanticError> for Error {
  fn from(e: SemanticError) -> Self {
    Self::Semantic(e)
  }
}

impl From<CryptoError> for Error {
  fn from(e: CryptoError) -> Self {
    Self::Crypto(e)
  }
}

impl From<UriError> for Error {
  fn from(e: UriError) -> Self {
    Self::Uri(e)
  }
}

impl From<TransportError> for Error {
  fn from(e: TransportError) -> Self {
    Self::Transport(e)
  }
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::Encoding(e) => write!(f, "{e}"),
      | Self::Semantic(e) => write!(f, "{e}"),
      | Self::Crypto(e) => write!(f, "{e}"),
      | Self::Uri(e) => write!(f, "{e}"),
      | Self::Transport(e) => write!(f, "{e}"),
    }
  }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
