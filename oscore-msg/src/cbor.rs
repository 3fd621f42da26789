//! Deterministic CBOR over the small, fixed vocabulary OSCORE needs: fixed
//! length arrays, byte strings, text strings, integers, and `null`.
//!
//! Every [`Value`] tree can be turned into bytes two ways:
//! - [`encoded_len`] — the sizing pass: no bytes are written, only the
//!   length that would be written is computed.
//! - [`encode_to_slice`] — the writing pass: writes into a caller-sized
//!   buffer, failing with [`CborError`] if the buffer is too small.
//!
//! Both passes run through [`write`], so a change to the CBOR shape can
//! never make the two passes disagree.

use crate::buf::{CountingSink, Sink, SliceSink};
use crate::error::CborError;

/// A CBOR value drawn from the fixed vocabulary this crate encodes: arrays,
/// byte strings, text strings, integers and null.
///
/// Borrows its byte/text/array contents so building one up costs no
/// allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
  /// A CBOR integer (major type 0 for `n >= 0`, major type 1 otherwise).
  Int(i64),
  /// A CBOR byte string (major type 2).
  Bytes(&'a [u8]),
  /// A CBOR text string (major type 3), encoded without a trailing NUL.
  Text(&'a str),
  /// A CBOR fixed-length array (major type 4).
  Array(&'a [Value<'a>]),
  /// CBOR `null` (the simple value `0xf6`).
  Null,
}

const MAJOR_UINT: u8 = 0;
const MAJOR_NEGINT: u8 = 1;
const MAJOR_BYTES: u8 = 2;
const MAJOR_TEXT: u8 = 3;
const MAJOR_ARRAY: u8 = 4;

fn write_head<S: Sink>(major: u8, n: u64, sink: &mut S) {
  let major = major << 5;

  match n {
    | n if n < 24 => sink.push(major | n as u8),
    | n if n <= 0xFF => {
      sink.push(major | 24);
      sink.push(n as u8);
    },
    | n if n <= 0xFFFF => {
      sink.push(major | 25);
      sink.extend(&(n as u16).to_be_bytes());
    },
    | n if n <= 0xFFFF_FFFF => {
      sink.push(major | 26);
      sink.extend(&(n as u32).to_be_bytes());
    },
    | n => {
      sink.push(major | 27);
      sink.extend(&n.to_be_bytes());
    },
  }
}

/// Write `value` into `sink`, sharing code between the sizing pass
/// ([`CountingSink`]) and the writing pass ([`SliceSink`]).
pub fn write<S: Sink>(value: &Value<'_>, sink: &mut S) {
  match *value {
    | Value::Int(n) if n >= 0 => write_head(MAJOR_UINT, n as u64, sink),
    | Value::Int(n) => write_head(MAJOR_NEGINT, (-(n + 1)) as u64, sink),
    | Value::Bytes(b) => {
      write_head(MAJOR_BYTES, b.len() as u64, sink);
      sink.extend(b);
    },
    | Value::Text(s) => {
      write_head(MAJOR_TEXT, s.len() as u64, sink);
      sink.extend(s.as_bytes());
    },
    | Value::Array(items) => {
      write_head(MAJOR_ARRAY, items.len() as u64, sink);
      items.iter().for_each(|item| write(item, sink));
    },
    | Value::Null => sink.push(0xf6),
  }
}

/// Sizing pass: the number of bytes [`encode_to_slice`] would write for
/// `value`, without writing any of them.
pub fn encoded_len(value: &Value<'_>) -> usize {
  let mut sink = CountingSink::default();
  write(value, &mut sink);
  sink.0
}

/// Writing pass: encode `value` into `buf`, returning the number of bytes
/// written.
///
/// Callers are expected to size `buf` with [`encoded_len`] first; this
/// never allocates and fails with [`CborError::WriterOverrun`] if `buf` runs
/// out of room before encoding finishes.
pub fn encode_to_slice(value: &Value<'_>, buf: &mut [u8]) -> Result<usize, CborError> {
  let mut sink = SliceSink::new(buf);
  write(value, &mut sink);
  match sink.error {
    | Some(e) => Err(e),
    | None => Ok(sink.written()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn roundtrip(value: Value<'_>, expected: &[u8]) {
    assert_eq!(encoded_len(&value), expected.len());

    let mut buf = vec![0u8; encoded_len(&value)];
    let n = encode_to_slice(&value, &mut buf).unwrap();
    assert_eq!(n, expected.len());
    assert_eq!(buf, expected);
  }

  #[test]
  fn small_uint() {
    roundtrip(Value::Int(10), &[0x0a]);
  }

  #[test]
  fn uint_one_byte_follow() {
    roundtrip(Value::Int(24), &[0x18, 0x18]);
  }

  #[test]
  fn uint_two_byte_follow() {
    roundtrip(Value::Int(256), &[0x19, 0x01, 0x00]);
  }

  #[test]
  fn negative_int() {
    roundtrip(Value::Int(-1), &[0x20]);
  }

  #[test]
  fn byte_string() {
    roundtrip(Value::Bytes(&[1, 2, 3]), &[0x43, 1, 2, 3]);
  }

  #[test]
  fn empty_byte_string() {
    roundtrip(Value::Bytes(&[]), &[0x40]);
  }

  #[test]
  fn text_string() {
    roundtrip(Value::Text("IV"), &[0x62, b'I', b'V']);
  }

  #[test]
  fn null_value() {
    roundtrip(Value::Null, &[0xf6]);
  }

  #[test]
  fn array_of_mixed_values() {
    let items = [Value::Int(1), Value::Bytes(&[0xff]), Value::Null];
    roundtrip(Value::Array(&items), &[0x83, 0x01, 0x41, 0xff, 0xf6]);
  }

  #[test]
  fn overrun_reports_capacity_and_required() {
    let value = Value::Bytes(&[1, 2, 3]);
    let mut buf = [0u8; 2];
    let err = encode_to_slice(&value, &mut buf).unwrap_err();
    assert_eq!(err, CborError::WriterOverrun { capacity: 2, required: 3 });
  }
}
