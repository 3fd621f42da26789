//! The HKDF info structure (§4.4): `[ id, id_context, aead_alg, type, L ]`,
//! CBOR-encoded with the same sizing-then-writing split as every other
//! encoder in this workspace.

use oscore_msg::cbor::{self, Value};
use oscore_msg::CborError;

/// Which quantity is being derived. The wire text is case-sensitive and
/// must match exactly, which is why both sizing and encoding go through
/// [`DerivationType::as_str`] rather than two independently-maintained
/// string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivationType {
  /// Deriving a Sender/Recipient key.
  Key,
  /// Deriving the Common IV.
  Iv,
}

impl DerivationType {
  fn as_str(&self) -> &'static str {
    match self {
      | Self::Key => "Key",
      | Self::Iv => "IV",
    }
  }
}

/// The 5-element info array for one derivation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Info<'a> {
  /// Sender/Recipient ID for keys, empty for the Common IV.
  pub id: &'a [u8],
  /// The shared ID Context, if any.
  pub id_context: Option<&'a [u8]>,
  /// COSE AEAD algorithm identifier.
  pub aead_alg: i64,
  /// `"Key"` or `"IV"`.
  pub ty: DerivationType,
  /// Output length in bytes.
  pub length: i64,
}

impl<'a> Info<'a> {
  fn with_value<R>(&self, f: impl FnOnce(&Value<'_>) -> R) -> R {
    let id_context = match self.id_context {
      | Some(ctx) => Value::Bytes(ctx),
      | None => Value::Null,
    };
    let items = [Value::Bytes(self.id),
                 id_context,
                 Value::Int(self.aead_alg),
                 Value::Text(self.ty.as_str()),
                 Value::Int(self.length)];
    f(&Value::Array(&items))
  }

  /// Sizing pass.
  pub fn encoded_len(&self) -> usize {
    self.with_value(cbor::encoded_len)
  }

  /// Writing pass.
  pub fn encode_to_slice(&self, buf: &mut [u8]) -> Result<usize, CborError> {
    self.with_value(|v| cbor::encode_to_slice(v, buf))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn common_iv_info_shape() {
    let info = Info { id: &[], id_context: None, aead_alg: 10, ty: DerivationType::Iv, length: 13 };
    let mut buf = vec![0u8; info.encoded_len()];
    info.encode_to_slice(&mut buf).unwrap();
    // [h'', null, 10, "IV", 13]
    assert_eq!(buf, vec![0x85, 0x40, 0xf6, 0x0a, 0x62, b'I', b'V', 0x0d]);
  }

  #[test]
  fn sender_key_info_shape() {
    let info = Info { id: &[0x01], id_context: None, aead_alg: 10, ty: DerivationType::Key, length: 16 };
    let mut buf = vec![0u8; info.encoded_len()];
    info.encode_to_slice(&mut buf).unwrap();
    // [h'01', null, 10, "Key", 16]
    assert_eq!(buf, vec![0x85, 0x41, 0x01, 0xf6, 0x0a, 0x63, b'K', b'e', b'y', 0x10]);
  }

  #[test]
  fn id_context_present_is_a_byte_string_not_null() {
    let info = Info { id: &[0x01], id_context: Some(&[0xaa, 0xbb]), aead_alg: 10, ty: DerivationType::Key, length: 16 };
    let mut buf = vec![0u8; info.encoded_len()];
    info.encode_to_slice(&mut buf).unwrap();
    assert_eq!(&buf[2..5], &[0x42, 0xaa, 0xbb]);
  }
}
