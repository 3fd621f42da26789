//! The external AAD and the COSE `Encrypt0_structure` wrapping it (§4.10).
//!
//! ```text
//! external_aad = [ oscore_version=1, [aead_alg], request_kid, request_piv, class_i_options ]
//! Enc_structure = [ "Encrypt0", h'' (empty protected), external_aad_bytes ]
//! ```
//!
//! `request_kid` and `request_piv` are always the *request's* values, even
//! when protecting a response, so both peers compute the same AAD (§4.10).

use crate::cbor::{self, Value};
use crate::error::CborError;

const OSCORE_VERSION: i64 = 1;

/// The 5-element external AAD array (§4.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalAad<'a> {
  /// COSE algorithm identifier (10 for AES-CCM-16-64-128).
  pub aead_alg: i64,
  /// The *request's* Sender ID.
  pub request_kid: &'a [u8],
  /// The *request's* Partial IV.
  pub request_piv: &'a [u8],
  /// The encoded Class I option subsequence. Always empty in this version of
  /// OSCORE (Class I is presently empty) but present for spec stability.
  pub class_i_options: &'a [u8],
}

impl<'a> ExternalAad<'a> {
  fn with_value<R>(&self, f: impl FnOnce(&Value<'_>) -> R) -> R {
    let alg = [Value::Int(self.aead_alg)];
    let items = [Value::Int(OSCORE_VERSION),
                 Value::Array(&alg),
                 Value::Bytes(self.request_kid),
                 Value::Bytes(self.request_piv),
                 Value::Bytes(self.class_i_options)];
    f(&Value::Array(&items))
  }

  /// Sizing pass: bytes this external AAD would encode to.
  pub fn encoded_len(&self) -> usize {
    self.with_value(cbor::encoded_len)
  }

  /// Writing pass: encode this external AAD into `buf`.
  pub fn encode_to_slice(&self, buf: &mut [u8]) -> Result<usize, CborError> {
    self.with_value(|v| cbor::encode_to_slice(v, buf))
  }
}

/// The COSE `Encrypt0_structure` (§4.10), wrapping an already-encoded
/// external AAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncStructure<'a> {
  /// The CBOR bytes of an [`ExternalAad`], produced by
  /// [`ExternalAad::encode_to_slice`].
  pub external_aad: &'a [u8],
}

impl<'a> EncStructure<'a> {
  fn with_value<R>(&self, f: impl FnOnce(&Value<'_>) -> R) -> R {
    let items = [Value::Text("Encrypt0"), Value::Bytes(&[]), Value::Bytes(self.external_aad)];
    f(&Value::Array(&items))
  }

  /// Sizing pass: bytes this `Encrypt0_structure` would encode to.
  pub fn encoded_len(&self) -> usize {
    self.with_value(cbor::encoded_len)
  }

  /// Writing pass: encode this `Encrypt0_structure` into `buf`. This is the
  /// byte string passed as `aad` to the AEAD.
  pub fn encode_to_slice(&self, buf: &mut [u8]) -> Result<usize, CborError> {
    self.with_value(|v| cbor::encode_to_slice(v, buf))
  }
}

#[cfg(feature = "alloc")]
mod alloc_ext {
  use std_alloc::vec::Vec;

  use super::*;
  use crate::std_alloc;

  impl<'a> ExternalAad<'a> {
    /// Allocate and return the encoded external AAD.
    pub fn to_vec(&self) -> Vec<u8> {
      let mut buf = std_alloc::vec![0u8; self.encoded_len()];
      self.encode_to_slice(&mut buf).expect("buffer sized by encoded_len");
      buf
    }
  }

  impl<'a> EncStructure<'a> {
    /// Allocate and return the encoded `Encrypt0_structure`.
    pub fn to_vec(&self) -> Vec<u8> {
      let mut buf = std_alloc::vec![0u8; self.encoded_len()];
      self.encode_to_slice(&mut buf).expect("buffer sized by encoded_len");
      buf
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn external_aad_sizing_matches_encoding() {
    let aad = ExternalAad { aead_alg: 10,
                            request_kid: &[0x01],
                            request_piv: &[0x14],
                            class_i_options: &[] };
    let mut buf = vec![0u8; aad.encoded_len()];
    let n = aad.encode_to_slice(&mut buf).unwrap();
    assert_eq!(n, buf.len());
  }

  #[test]
  fn external_aad_shape() {
    let aad = ExternalAad { aead_alg: 10,
                            request_kid: &[0x01],
                            request_piv: &[0x14],
                            class_i_options: &[] };
    let bytes = aad.to_vec();
    // [1, [10], h'01', h'14', h'']
    assert_eq!(bytes,
               vec![0x85, 0x01, 0x81, 0x0a, 0x41, 0x01, 0x41, 0x14, 0x40]);
  }

  #[test]
  fn enc_structure_wraps_external_aad() {
    let aad = ExternalAad { aead_alg: 10,
                            request_kid: &[0x01],
                            request_piv: &[0x14],
                            class_i_options: &[] }.to_vec();
    let enc = EncStructure { external_aad: &aad };
    let bytes = enc.to_vec();

    assert_eq!(bytes[0], 0x83); // array of 3
    assert_eq!(&bytes[1..1 + 1 + "Encrypt0".len()], {
      let mut expect = vec![0x68];
      expect.extend_from_slice(b"Encrypt0");
      Box::leak(expect.into_boxed_slice())
    });
  }
}
