//! Error kinds for wire-format failures (§7 "Encoding" and "Proxy URI" families).
//!
//! Mirrors the plain-enum, no-sentinel-integers style of
//! `toad_msg::to_bytes::MessageToBytesError` / `toad_msg::OptParseError`.

use core::fmt;

/// Failures sizing or writing a CBOR structure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CborError {
  /// The destination buffer was shorter than the sizing pass reported.
  WriterOverrun {
    /// bytes the destination buffer actually had
    capacity: usize,
    /// bytes the sizing pass said were required
    required: usize,
  },
}

impl fmt::Display for CborError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::WriterOverrun { capacity, required } => {
        write!(f,
               "CBOR encode overran its buffer: capacity {capacity}, required {required}")
      },
    }
  }
}

/// Every "Encoding" family error from §7.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EncodingError {
  /// See [`CborError`]
  Cbor(CborError),
  /// A CoAP option's delta or length nibble was the reserved value 15, or a
  /// declared length ran past the end of the input.
  InvalidOptionLength,
  /// A Partial IV was 6 bytes or longer on decode (`n >= 8` bit pattern) or
  /// exceeded 5 bytes on encode.
  InvalidPartialIvLength,
  /// A `kid` exceeded the space left in the OSCORE option value.
  InvalidKidLength,
  /// A `kid_context` was 256 bytes or longer.
  InvalidKidContextLength,
  /// A Common IV or nonce was not exactly 13 bytes.
  InvalidIvLength,
  /// A Partial IV carried a leading zero byte it should have been trimmed of.
  InvalidIvUntrimmed,
  /// A Sender/Recipient key was not exactly the algorithm's key length.
  InvalidKeyLength,
  /// A derivation was asked to produce a zero-length output.
  InvalidOutputLength,
  /// HKDF-Expand was asked for more than `255 * 32` bytes.
  OutputTooLong,
}

impl From<CborError> for EncodingError {
  fn from(e: CborError) -> Self {
    Self::Cbor(e)
  }
}

impl fmt::Display for EncodingError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::Cbor(e) => write!(f, "{e}"),
      | Self::InvalidOptionLength => write!(f, "option delta/length encoding invalid or truncated"),
      | Self::InvalidPartialIvLength => write!(f, "partial IV longer than 5 bytes"),
      | Self::InvalidKidLength => write!(f, "kid longer than the remaining option value"),
      | Self::InvalidKidContextLength => write!(f, "kid context is 256 bytes or longer"),
      | Self::InvalidIvLength => write!(f, "IV is not exactly 13 bytes"),
      | Self::InvalidIvUntrimmed => write!(f, "partial IV has a leading zero byte"),
      | Self::InvalidKeyLength => write!(f, "key is not the algorithm's expected length"),
      | Self::InvalidOutputLength => write!(f, "requested a zero-length derivation output"),
      | Self::OutputTooLong => write!(f, "HKDF-Expand output exceeds 255 * hash length"),
    }
  }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodingError {}

/// Every "Proxy URI" family error from §7.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UriError {
  /// The URI scheme was neither `coap` nor `coaps`.
  InvalidProtocol,
  /// The URI carried a fragment, which CoAP proxy URIs must not.
  InvalidFragment,
  /// The URI could not be parsed into scheme/host/port at all.
  ParserError,
}

impl fmt::Display for UriError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::InvalidProtocol => write!(f, "proxy uri scheme is not coap or coaps"),
      | Self::InvalidFragment => write!(f, "proxy uri must not carry a fragment"),
      | Self::ParserError => write!(f, "proxy uri could not be parsed"),
    }
  }
}

#[cfg(feature = "std")]
impl std::error::Error for UriError {}
