//! Classifies CoAP options into Class U (unprotected), Class E (encrypted +
//! integrity-protected) and Class I (integrity-protected only, currently
//! empty), and encodes/decodes each filtered subsequence bit-exactly.
//!
//! Grounded on the same "keep some of the map, re-emit with recomputed
//! deltas" shape `toad_msg::OptIter` uses when it walks an `OptionMap` and
//! recomputes each entry's delta from the previous *emitted* number — here
//! generalized to recompute deltas from the previous *kept* number, across
//! whichever subset a [`OptionClass`] selects.

use crate::buf::Sink;
use crate::coap_option::{self, CoapOption};
use crate::error::{EncodingError, UriError};
use crate::numbers;

/// A CoAP option together with its absolute option number (as opposed to
/// [`CoapOption`], which only carries the delta from its predecessor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberedOption<'a> {
  /// Absolute option number.
  pub number: u16,
  /// The option's value.
  pub value: &'a [u8],
}

/// Recover absolute option numbers from a delta-encoded sequence by running
/// sum, as would be yielded by [`crate::coap_option::Options`].
pub fn numbered<'a>(decoded: impl IntoIterator<Item = CoapOption<'a>>)
                     -> impl Iterator<Item = NumberedOption<'a>> {
  let mut acc: u16 = 0;
  decoded.into_iter().map(move |opt| {
                       acc = acc.saturating_add(opt.delta);
                       NumberedOption { number: acc, value: opt.value }
                     })
}

/// Which of the three OSCORE option classes (§4.7) an option number belongs
/// to.
///
/// Class membership is **not** mutually exclusive: an option number may
/// belong to both Class U and Class E (e.g. `Observe` and `No-Response`),
/// which is why this is a predicate over one class at a time rather than a
/// function returning a single `OptionClass`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionClass {
  /// Left visible on the outer, unprotected message.
  U,
  /// Moved into the encrypted plaintext.
  E,
  /// Integrity-protected but not encrypted. Empty in this version of OSCORE.
  I,
}

impl OptionClass {
  /// Whether `number` belongs to this class.
  pub fn contains(&self, number: u16) -> bool {
    match self {
      | Self::U => numbers::CLASS_U.contains(&number),
      | Self::E => !numbers::CLASS_E_EXCLUDED.contains(&number),
      | Self::I => false,
    }
  }
}

/// Filter `options` down to the members of `class`, recomputing each kept
/// option's delta from the previous *kept* option's absolute number — so
/// skipped options contribute their raw delta to whichever kept option
/// follows them, preserving absolute numbers across the filter.
pub fn filter_and_redelta<'a>(options: impl IntoIterator<Item = NumberedOption<'a>>,
                               class: OptionClass)
                               -> impl Iterator<Item = CoapOption<'a>> {
  let mut prev: u16 = 0;
  options.into_iter()
         .filter(move |o| class.contains(o.number))
         .map(move |o| {
           let delta = o.number - prev;
           prev = o.number;
           CoapOption { delta, value: o.value }
         })
}

/// Bytes needed to encode only the options of `class` out of `options`
/// (§4.7 `encoded_length`).
pub fn encoded_length<'a>(options: impl IntoIterator<Item = NumberedOption<'a>>,
                           class: OptionClass)
                           -> usize {
  coap_option::encoded_len(filter_and_redelta(options, class))
}

/// Emit only the options of `class` out of `options` (§4.7 `encode`).
pub fn encode<'a, S: Sink>(options: impl IntoIterator<Item = NumberedOption<'a>>,
                           class: OptionClass,
                           sink: &mut S) {
  coap_option::encode(filter_and_redelta(options, class), sink)
}

/// Rewrite a `Proxy-Uri` value down to `scheme://host[:port]`, stripping any
/// path, query or fragment (§4.7 edge case).
///
/// Path and query carry request-specific intent and are re-expressed as
/// `Uri-Path`/`Uri-Query` (Class E) rather than forwarded in the Class U
/// `Proxy-Uri`. A URI carrying a fragment is rejected outright: CoAP proxy
/// URIs must not have one.
///
/// Returns the rewritten authority-only URI (as bytes, reusing the caller's
/// buffer is left to them) and the remaining path+query to re-emit as
/// `Uri-Path`/`Uri-Query` options.
pub fn rewrite_proxy_uri(uri: &str) -> Result<(&str, &str), UriError> {
  let (scheme, rest) = uri.split_once("://").ok_or(UriError::ParserError)?;

  if scheme != "coap" && scheme != "coaps" {
    return Err(UriError::InvalidProtocol);
  }

  if rest.contains('#') {
    return Err(UriError::InvalidFragment);
  }

  let path_start = rest.find('/').unwrap_or(rest.len());
  let authority = &rest[..path_start];
  let path_and_query = &rest[path_start..];

  if authority.is_empty() {
    return Err(UriError::ParserError);
  }

  Ok((authority, path_and_query))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn opts<'a>(pairs: &'a [(u16, &'a [u8])]) -> Vec<NumberedOption<'a>> {
    pairs.iter().map(|&(number, value)| NumberedOption { number, value }).collect()
  }

  #[test]
  fn class_membership_is_not_mutually_exclusive() {
    assert!(OptionClass::U.contains(numbers::OBSERVE));
    assert!(OptionClass::E.contains(numbers::OBSERVE));

    assert!(OptionClass::U.contains(numbers::NO_RESPONSE));
    assert!(OptionClass::E.contains(numbers::NO_RESPONSE));

    assert!(OptionClass::U.contains(numbers::OSCORE));
    assert!(!OptionClass::E.contains(numbers::OSCORE));

    // unknown options default to Class E
    assert!(OptionClass::E.contains(9999));
  }

  #[test]
  fn skipped_options_carry_their_delta_forward() {
    // Uri-Host(3), Uri-Path(11), Content-Format(12)
    let numbered = opts(&[(numbers::URI_HOST, b"x".as_ref()), (11, b"a".as_ref()), (12, b"json".as_ref())]);

    let class_e: Vec<_> = filter_and_redelta(numbered.clone(), OptionClass::E).collect();
    // Uri-Host (3) dropped; Uri-Path keeps its absolute delta from 0 (11),
    // Content-Format's delta is computed from Uri-Path (12 - 11 = 1).
    assert_eq!(class_e,
               vec![CoapOption { delta: 11, value: b"a" }, CoapOption { delta: 1, value: b"json" }]);
  }

  #[test]
  fn numbered_recovers_absolute_numbers_from_deltas() {
    let decoded = [CoapOption { delta: 3, value: &[] }, CoapOption { delta: 5, value: &[] }];
    let numbers: Vec<_> = numbered(decoded).map(|o| o.number).collect();
    assert_eq!(numbers, vec![3, 8]);
  }

  #[test]
  fn proxy_uri_rewrite_strips_path_and_query() {
    let (authority, rest) = rewrite_proxy_uri("coap://example.com:5683/a/b?x=1").unwrap();
    assert_eq!(authority, "example.com:5683");
    assert_eq!(rest, "/a/b?x=1");
  }

  #[test]
  fn proxy_uri_rewrite_rejects_bad_scheme() {
    assert_eq!(rewrite_proxy_uri("http://example.com").unwrap_err(), UriError::InvalidProtocol);
  }

  #[test]
  fn proxy_uri_rewrite_rejects_fragment() {
    assert_eq!(rewrite_proxy_uri("coap://example.com/a#frag").unwrap_err(),
               UriError::InvalidFragment);
  }
}
