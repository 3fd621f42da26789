//! HKDF-SHA-256 (§4.3): standard RFC 5869 extract-then-expand, plus a
//! `derive` convenience that builds the CBOR info structure (§4.4) and
//! expands directly into a caller-sized buffer.
//!
//! If `salt` is empty, [`hkdf::Hkdf::new`] substitutes a zero-filled salt of
//! the hash's output length on our behalf, matching §4.3's "if salt is empty
//! or absent, substitute 32 zero bytes" exactly.

use hkdf::Hkdf;
use oscore_msg::EncodingError;
use sha2::Sha256;

use crate::hkdf_info::Info;

/// HKDF-Expand's maximum output length: `255 * HashLen`.
pub const MAX_OUTPUT_LEN: usize = 255 * 32;

/// Extract-then-expand `out.len()` bytes from `(salt, ikm, info)`.
///
/// Fails with [`EncodingError::InvalidOutputLength`] if `out` is empty, or
/// [`EncodingError::OutputTooLong`] if `out.len() > 255 * 32`.
pub fn extract_and_expand(salt: &[u8], ikm: &[u8], info: &[u8], out: &mut [u8])
                           -> Result<(), EncodingError> {
  if out.is_empty() {
    return Err(EncodingError::InvalidOutputLength);
  }

  if out.len() > MAX_OUTPUT_LEN {
    return Err(EncodingError::OutputTooLong);
  }

  let salt = if salt.is_empty() { None } else { Some(salt) };
  let hk = Hkdf::<Sha256>::new(salt, ikm);
  hk.expand(info, out).map_err(|_| EncodingError::OutputTooLong)
}

/// Build the info structure described by `info`, then extract-and-expand
/// into `out`. This is the single internal routine §4.5 calls `derive`.
pub fn derive(salt: &[u8], ikm: &[u8], info: &Info<'_>, out: &mut [u8]) -> Result<(), EncodingError> {
  let mut encoded = std_alloc::vec![0u8; info.encoded_len()];
  info.encode_to_slice(&mut encoded)?;
  extract_and_expand(salt, ikm, &encoded, out)
}

#[cfg(test)]
mod tests {
  use hex_literal::hex;

  use super::*;

  // RFC 5869 Test Case 1 (Scenario F).
  #[test]
  fn rfc5869_test_case_1() {
    let ikm = hex!("0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b");
    let salt = hex!("000102030405060708090a0b0c");
    let info = hex!("f0f1f2f3f4f5f6f7f8f9");
    let expected_okm =
      hex!("3cb25f25faacd57a90434f64d0362f2a2d2d0a90cf1a5a4c5db02d56ecc4c5bf34007208d5b887185865");

    let mut out = [0u8; 42];
    extract_and_expand(&salt, &ikm, &info, &mut out).unwrap();
    assert_eq!(out, expected_okm);
  }

  // RFC 5869 Test Case 2 (Scenario F): longer inputs, longer output.
  #[test]
  fn rfc5869_test_case_2() {
    let ikm = hex!("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f202122232425262728292a2b2c2d2e2f303132333435363738393a3b3c3d3e3f404142434445464748494a4b4c4d4e4f");
    let salt = hex!("606162636465666768696a6b6c6d6e6f707172737475767778797a7b7c7d7e7f808182838485868788898a8b8c8d8e8f909192939495969798999a9b9c9d9e9fa0a1a2a3a4a5a6a7a8a9aaabacadaeaf");
    let info = hex!("b0b1b2b3b4b5b6b7b8b9babbbcbdbebfc0c1c2c3c4c5c6c7c8c9cacbcccdcecfd0d1d2d3d4d5d6d7d8d9dadbdcdddedfe0e1e2e3e4e5e6e7e8e9eaebecedeeeff0f1f2f3f4f5f6f7f8f9fafbfcfdfeff");
    let expected_okm = hex!("b11e398dc80327a1c8e7f78c596a49344f012eda2d4efad8a050cc4c19afa97c59045a99cac7827271cb41c65e590e09da3275600c2f09b8367793a9aca3db71cc30c58179ec3e87c14c01d5c1f3434f1d87");

    let mut out = [0u8; 82];
    extract_and_expand(&salt, &ikm, &info, &mut out).unwrap();
    assert_eq!(out, expected_okm);
  }

  #[test]
  fn empty_salt_uses_zero_filled_default() {
    let mut with_empty = [0u8; 16];
    let mut with_zero = [0u8; 16];
    extract_and_expand(&[], b"ikm", b"info", &mut with_empty).unwrap();
    extract_and_expand(&[0u8; 32], b"ikm", b"info", &mut with_zero).unwrap();
    assert_eq!(with_empty, with_zero);
  }

  #[test]
  fn max_output_length_succeeds() {
    let mut out = std_alloc::vec![0u8; MAX_OUTPUT_LEN];
    assert!(extract_and_expand(b"salt", b"ikm", b"info", &mut out).is_ok());
  }

  #[test]
  fn output_longer_than_max_fails() {
    let mut out = std_alloc::vec![0u8; MAX_OUTPUT_LEN + 1];
    let err = extract_and_expand(b"salt", b"ikm", b"info", &mut out).unwrap_err();
    assert_eq!(err, EncodingError::OutputTooLong);
  }

  #[test]
  fn zero_length_output_fails() {
    let mut out: [u8; 0] = [];
    let err = extract_and_expand(b"salt", b"ikm", b"info", &mut out).unwrap_err();
    assert_eq!(err, EncodingError::InvalidOutputLength);
  }
}
