//! AES-CCM-16-64-128 seal/open (§4.2): a 13-byte nonce, 8-byte tag, 128-bit
//! key, 16-bit length field. Thin wrapper over the `aes`/`ccm` crates so the
//! rest of this crate only ever sees byte slices and [`CryptoError`].

use std_alloc::vec::Vec;

use aes::Aes128;
use ccm::aead::generic_array::GenericArray;
use ccm::aead::{Aead, KeyInit, Payload};
use ccm::consts::{U13, U8};
use ccm::Ccm;

use crate::error::CryptoError;

type Aes128Ccm16_64_128 = Ccm<Aes128, U8, U13>;

/// Key length in bytes for AES-CCM-16-64-128.
pub const KEY_LEN: usize = 16;
/// Nonce length in bytes for AES-CCM-16-64-128.
pub const NONCE_LEN: usize = 13;
/// Tag length in bytes for AES-CCM-16-64-128.
pub const TAG_LEN: usize = 8;

/// Encrypt `plaintext` under `key`/`nonce`, authenticating `aad`. Returns
/// `plaintext.len() + TAG_LEN` bytes.
pub fn seal(key: &[u8; KEY_LEN], nonce: &[u8; NONCE_LEN], plaintext: &[u8], aad: &[u8])
            -> Result<Vec<u8>, CryptoError> {
  let cipher = Aes128Ccm16_64_128::new(GenericArray::from_slice(key));
  cipher.encrypt(GenericArray::from_slice(nonce), Payload { msg: plaintext, aad })
        .map_err(|_| CryptoError::AeadVerifyFailed)
}

/// Decrypt and verify `ciphertext` under `key`/`nonce`/`aad`. Fails with
/// [`CryptoError::AeadVerifyFailed`] (and emits no partial plaintext) if the
/// tag does not verify.
pub fn open(key: &[u8; KEY_LEN], nonce: &[u8; NONCE_LEN], ciphertext: &[u8], aad: &[u8])
            -> Result<Vec<u8>, CryptoError> {
  let cipher = Aes128Ccm16_64_128::new(GenericArray::from_slice(key));
  cipher.decrypt(GenericArray::from_slice(nonce), Payload { msg: ciphertext, aad })
        .map_err(|_| CryptoError::AeadVerifyFailed)
}
