//! AEAD nonce construction for AES-CCM-16-64-128 (§4.9): deterministic from
//! the Partial IV, the Sender ID that produced it, and the Common IV.

use crate::error::EncodingError;

/// Total nonce length for AES-CCM-16-64-128.
pub const NONCE_LEN: usize = 13;

const PIV_FIELD_LEN: usize = 5;
const ID_FIELD_LEN: usize = NONCE_LEN - 1 - PIV_FIELD_LEN; // 7

/// Build the 13-byte AEAD nonce from `id_piv` (the Sender ID of whichever
/// endpoint produced `partial_iv`), the trimmed `partial_iv` itself, and the
/// context's `common_iv`.
///
/// `partial_iv` must already satisfy the trimmed invariant (no leading zero
/// byte unless it is exactly `[0x00]`) and be at most 5 bytes; `id_piv` must
/// be at most 7 bytes (the space left for it once the 1-byte length prefix
/// and 5-byte Partial IV field are accounted for).
pub fn build_nonce(id_piv: &[u8], partial_iv: &[u8], common_iv: &[u8; NONCE_LEN])
                    -> Result<[u8; NONCE_LEN], EncodingError> {
  if partial_iv.len() > 1 && partial_iv[0] == 0 {
    return Err(EncodingError::InvalidIvUntrimmed);
  }

  if partial_iv.len() > PIV_FIELD_LEN {
    return Err(EncodingError::InvalidPartialIvLength);
  }

  if id_piv.len() > ID_FIELD_LEN {
    return Err(EncodingError::InvalidKidLength);
  }

  let mut plain = [0u8; NONCE_LEN];
  plain[0] = id_piv.len() as u8;

  let id_start = 1 + (ID_FIELD_LEN - id_piv.len());
  plain[id_start..1 + ID_FIELD_LEN].copy_from_slice(id_piv);

  let piv_start = NONCE_LEN - partial_iv.len();
  plain[piv_start..].copy_from_slice(partial_iv);

  let mut nonce = plain;
  nonce.iter_mut().zip(common_iv).for_each(|(n, c)| *n ^= c);

  Ok(nonce)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scenario_d_nonce_construction() {
    // id_piv = 01, partial_iv = 14, common_iv all zero for this unit test
    // (the literal Scenario A/D vector is exercised end-to-end in `oscore`).
    let common_iv = [0u8; NONCE_LEN];
    let nonce = build_nonce(&[0x01], &[0x14], &common_iv).unwrap();

    let mut expected = [0u8; NONCE_LEN];
    expected[0] = 1;
    expected[ID_FIELD_LEN] = 0x01; // id_piv right-aligned in its 7-byte field
    expected[NONCE_LEN - 1] = 0x14; // partial_iv right-aligned in its 5-byte field
    assert_eq!(nonce, expected);
  }

  #[test]
  fn nonce_is_xored_with_common_iv() {
    let common_iv = [0xff; NONCE_LEN];
    let nonce = build_nonce(&[0x01], &[0x14], &common_iv).unwrap();
    let plain = build_nonce(&[0x01], &[0x14], &[0u8; NONCE_LEN]).unwrap();

    for i in 0..NONCE_LEN {
      assert_eq!(nonce[i], plain[i] ^ 0xff);
    }
  }

  #[test]
  fn untrimmed_piv_rejected() {
    let err = build_nonce(&[0x01], &[0x00, 0x01], &[0u8; NONCE_LEN]).unwrap_err();
    assert_eq!(err, EncodingError::InvalidIvUntrimmed);
  }

  #[test]
  fn piv_of_zero_byte_accepted() {
    assert!(build_nonce(&[0x01], &[0x00], &[0u8; NONCE_LEN]).is_ok());
  }

  #[test]
  fn oversized_piv_rejected() {
    let err = build_nonce(&[0x01], &[1, 2, 3, 4, 5, 6], &[0u8; NONCE_LEN]).unwrap_err();
    assert_eq!(err, EncodingError::InvalidPartialIvLength);
  }
}
