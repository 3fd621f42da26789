//! CoAP option entry codec (RFC 7252 §3.1): parses and emits the delta/length
//! nibble-packed option sequence that sits between a CoAP message's token
//! and its optional `0xFF` payload marker.
//!
//! Grounded on `toad_msg`'s `to_bytes::opt_len_or_delta` /
//! `msg::opt::parse_opt_len_or_delta` and the `Opt`/`OptIter` types in
//! `toad_msg::msg::opt`, generalized from "options belonging to one CoAP
//! message" (keyed by absolute option number in a map) down to "one
//! delta-encoded option sequence", which is what the Class U/E/I
//! partitioner (§4.7) and the OSCORE protect/unprotect pipelines actually
//! operate on.

use crate::buf::{Cursor, Sink};
use crate::error::EncodingError;

/// The payload marker that ends a CoAP option sequence.
pub const PAYLOAD_MARKER: u8 = 0xFF;

/// One CoAP option as it appears on the wire: an offset (`delta`) from the
/// previous option's number, and a value.
///
/// Borrows its value from the buffer it was decoded out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoapOption<'a> {
  /// Offset from the previous option's absolute number.
  pub delta: u16,
  /// The option's value.
  pub value: &'a [u8],
}

/// `(nibble, extended bytes)` RFC 7252 uses to encode a delta or a length:
/// values 0–12 fit in the nibble itself; 13–268 use nibble 13 plus one
/// extended byte biased by -13; anything higher uses nibble 14 plus two
/// extended bytes (big-endian) biased by -269.
fn nibble_and_extended(n: u16) -> (u8, Option<[u8; 2]>) {
  match n {
    | n if n >= 269 => {
      let ext = (n - 269).to_be_bytes();
      (14, Some(ext))
    },
    | n if n >= 13 => (13, Some([(n - 13) as u8, 0])),
    | n => (n as u8, None),
  }
}

fn extended_len(n: u16) -> usize {
  match n {
    | n if n >= 269 => 2,
    | n if n >= 13 => 1,
    | _ => 0,
  }
}

fn read_nibble_and_extended(nibble: u8, bytes: &mut Cursor<'_>) -> Result<u16, EncodingError> {
  match nibble {
    | 13 => {
      let ext = bytes.next().ok_or(EncodingError::InvalidOptionLength)?;
      Ok(ext as u16 + 13)
    },
    | 14 => {
      let ext = bytes.take_exact(2)
                      .ok_or(EncodingError::InvalidOptionLength)?;
      Ok(u16::from_be_bytes([ext[0], ext[1]]) + 269)
    },
    | 15 => Err(EncodingError::InvalidOptionLength),
    | n => Ok(n as u16),
  }
}

impl<'a> CoapOption<'a> {
  /// Bytes this option would occupy on the wire.
  pub fn encoded_len(&self) -> usize {
    1 + extended_len(self.delta) + extended_len(self.value.len() as u16) + self.value.len()
  }

  /// Emit this option's bytes into `sink`.
  pub fn encode<S: Sink>(&self, sink: &mut S) {
    let (delta_nibble, delta_ext) = nibble_and_extended(self.delta);
    let (len_nibble, len_ext) = nibble_and_extended(self.value.len() as u16);

    sink.push((delta_nibble << 4) | len_nibble);

    if let Some(ext) = delta_ext {
      sink.extend(&ext[..extended_len(self.delta)]);
    }

    if let Some(ext) = len_ext {
      sink.extend(&ext[..extended_len(self.value.len() as u16)]);
    }

    sink.extend(self.value);
  }

  /// Decode one option from the front of `bytes`.
  ///
  /// Returns `Ok(None)` (without consuming the marker) when the next byte is
  /// the `0xFF` payload marker, or when the buffer is already exhausted —
  /// both mean "no more options", not an error.
  pub fn decode(bytes: &mut Cursor<'a>) -> Result<Option<Self>, EncodingError> {
    let head = match bytes.peek() {
      | None => return Ok(None),
      | Some(PAYLOAD_MARKER) => return Ok(None),
      | Some(b) => {
        bytes.next();
        b
      },
    };

    let delta = read_nibble_and_extended(head >> 4, bytes)?;
    let len = read_nibble_and_extended(head & 0x0F, bytes)? as usize;
    let value = bytes.take_exact(len)
                      .ok_or(EncodingError::InvalidOptionLength)?;

    Ok(Some(CoapOption { delta, value }))
  }
}

/// Sizing-only decode: walks the option sequence the same way [`decode_all`]
/// does, but only counts options and bytes consumed rather than
/// materializing any of them.
///
/// Returns `(option_count, bytes_consumed)`; `bytes_consumed` does not
/// include the `0xFF` marker itself.
pub fn decode_sizing(bytes: &[u8]) -> Result<(usize, usize), EncodingError> {
  let mut cursor = Cursor::new(bytes);
  let mut count = 0;

  while let Some(_opt) = CoapOption::decode(&mut cursor)? {
    count += 1;
  }

  Ok((count, cursor.position()))
}

/// An iterator over the options at the front of a buffer, stopping at the
/// `0xFF` payload marker or the end of the buffer.
#[derive(Debug)]
pub struct Options<'a> {
  cursor: Cursor<'a>,
  errored: bool,
}

impl<'a> Options<'a> {
  /// Start decoding the option sequence at the front of `bytes`.
  pub fn new(bytes: &'a [u8]) -> Self {
    Self { cursor: Cursor::new(bytes), errored: false }
  }

  /// Position the cursor has reached; useful to find where the payload
  /// marker (if any) begins after exhausting the iterator.
  pub fn position(&self) -> usize {
    self.cursor.position()
  }
}

impl<'a> Iterator for Options<'a> {
  type Item = Result<CoapOption<'a>, EncodingError>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.errored {
      return None;
    }

    match CoapOption::decode(&mut self.cursor) {
      | Ok(Some(opt)) => Some(Ok(opt)),
      | Ok(None) => None,
      | Err(e) => {
        self.errored = true;
        Some(Err(e))
      },
    }
  }
}

/// Bytes needed to encode `options` back onto the wire (not including any
/// `0xFF` payload marker).
pub fn encoded_len<'a>(options: impl IntoIterator<Item = CoapOption<'a>>) -> usize {
  options.into_iter().map(|opt| opt.encoded_len()).sum()
}

/// Emit `options` into `sink`, in the order given. Callers are responsible
/// for ensuring `options` are already sorted so their deltas sum to a
/// non-decreasing sequence of absolute numbers (§3's ordering invariant).
pub fn encode<'a, S: Sink>(options: impl IntoIterator<Item = CoapOption<'a>>, sink: &mut S) {
  options.into_iter().for_each(|opt| opt.encode(sink));
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::buf::CountingSink;

  fn bytes_of(opt: &CoapOption<'_>) -> Vec<u8> {
    let mut buf = vec![0u8; opt.encoded_len()];
    let mut sink = crate::buf::SliceSink::new(&mut buf);
    opt.encode(&mut sink);
    assert!(sink.error.is_none());
    buf
  }

  #[test]
  fn one_byte_option() {
    let opt = CoapOption { delta: 1, value: &[1] };
    assert_eq!(bytes_of(&opt), vec![0b0001_0001, 1]);
  }

  #[test]
  fn extended_delta_and_len() {
    let value = [1u8; 100];
    let opt = CoapOption { delta: 24, value: &value };
    let expected = [[0b1101_1101u8, 24 - 13, 100 - 13].as_ref(), value.as_ref()].concat();
    assert_eq!(bytes_of(&opt), expected);
  }

  #[test]
  fn two_byte_extended_len() {
    let value = [1u8; 300];
    let opt = CoapOption { delta: 24, value: &value };
    let mut expected = vec![0b1101_1110, 24 - 13];
    expected.extend((300u16 - 269).to_be_bytes());
    expected.extend(value);
    assert_eq!(bytes_of(&opt), expected);
  }

  #[test]
  fn decode_stops_at_marker() {
    let bytes = [0b0001_0001, 1, PAYLOAD_MARKER, 9, 9];
    let opts: Vec<_> = Options::new(&bytes).collect::<Result<_, _>>().unwrap();
    assert_eq!(opts, vec![CoapOption { delta: 1, value: &[1] }]);
  }

  #[test]
  fn decode_stops_at_end_of_buffer() {
    let bytes = [0b0001_0001, 1];
    let opts: Vec<_> = Options::new(&bytes).collect::<Result<_, _>>().unwrap();
    assert_eq!(opts, vec![CoapOption { delta: 1, value: &[1] }]);
  }

  #[test]
  fn decode_rejects_reserved_delta() {
    let bytes = [0b1111_0001, 1];
    let err = Options::new(&bytes).collect::<Result<Vec<_>, _>>().unwrap_err();
    assert_eq!(err, EncodingError::InvalidOptionLength);
  }

  #[test]
  fn decode_rejects_truncated_value() {
    let bytes = [0b0001_0101, 1, 2];
    let err = Options::new(&bytes).collect::<Result<Vec<_>, _>>().unwrap_err();
    assert_eq!(err, EncodingError::InvalidOptionLength);
  }

  #[test]
  fn sizing_matches_materialized_decode() {
    let bytes = [0b0001_0001, 1, 0b0010_0001, 2];
    let (count, len) = decode_sizing(&bytes).unwrap();
    assert_eq!(count, 2);
    assert_eq!(len, bytes.len());
  }

  #[test]
  fn round_trip() {
    let opts = [CoapOption { delta: 0, value: &[9] }, CoapOption { delta: 5, value: &[1, 2, 3] }];

    let mut counting = CountingSink::default();
    encode(opts.iter().copied(), &mut counting);
    assert_eq!(counting.0, encoded_len(opts.iter().copied()));

    let mut buf = vec![0u8; counting.0];
    let mut sink = crate::buf::SliceSink::new(&mut buf);
    encode(opts.iter().copied(), &mut sink);

    let decoded: Vec<_> = Options::new(&buf).collect::<Result<_, _>>().unwrap();
    assert_eq!(decoded, opts);
  }
}
