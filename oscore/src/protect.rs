//! The protect pipeline (§4.11): plaintext CoAP message → OSCORE message.

use std_alloc::vec::Vec;

use oscore_msg::aad::{EncStructure, ExternalAad};
use oscore_msg::buf::SliceSink;
use oscore_msg::coap_option::{self, Options, PAYLOAD_MARKER};
use oscore_msg::option_class::{filter_and_redelta, numbered, rewrite_proxy_uri, NumberedOption, OptionClass};
use oscore_msg::oscore_option::UnprotectedOscoreOption;
use oscore_msg::{build_nonce, numbers, UriError};

use crate::aead;
use crate::context::{CommonContext, SeqNumStore, SenderContext};
use crate::error::{Error, SemanticError};
use crate::transport::{CoapMessage, RawMessage};

/// The fixed outer response code §6 stands in with: `2.04 Changed`.
pub const OUTER_RESPONSE_CODE: u8 = 0x44;

fn numbered_options<'m>(msg: &'m dyn CoapMessage) -> Result<Vec<NumberedOption<'m>>, Error> {
  let decoded: Vec<_> = Options::new(msg.options_bytes()).collect::<Result<_, _>>()?;
  Ok(numbered(decoded).collect())
}

/// Rewrite a `Proxy-Uri` entry (if present) down to `scheme://host[:port]`,
/// re-expressing any path/query it carried as `Uri-Path`/`Uri-Query` entries
/// (§4.7 edge case).
fn apply_proxy_uri_rewrite<'m>(mut options: Vec<NumberedOption<'m>>) -> Result<Vec<NumberedOption<'m>>, Error> {
  let idx = match options.iter().position(|o| o.number == numbers::PROXY_URI) {
    | Some(i) => i,
    | None => return Ok(options),
  };

  let uri = core::str::from_utf8(options[idx].value).map_err(|_| Error::Uri(UriError::ParserError))?;
  let (authority, path_and_query) = rewrite_proxy_uri(uri)?;
  options[idx].value = authority.as_bytes();

  if !path_and_query.is_empty() {
    let (path, query) = path_and_query.split_once('?').unwrap_or((path_and_query, ""));

    for segment in path.split('/').filter(|s| !s.is_empty()) {
      options.push(NumberedOption { number: numbers::URI_PATH, value: segment.as_bytes() });
    }

    for param in query.split('&').filter(|s| !s.is_empty()) {
      options.push(NumberedOption { number: numbers::URI_QUERY, value: param.as_bytes() });
    }
  }

  options.sort_by_key(|o| o.number);
  Ok(options)
}

fn build_plaintext(code: u8, options: &[NumberedOption<'_>], payload: &[u8]) -> Vec<u8> {
  let opts_len = coap_option::encoded_len(filter_and_redelta(options.iter().copied(), OptionClass::E));
  let marker_and_payload = if payload.is_empty() { 0 } else { 1 + payload.len() };

  let mut buf = std_alloc::vec![0u8; 1 + opts_len + marker_and_payload];
  buf[0] = code;

  {
    let mut sink = SliceSink::new(&mut buf[1..1 + opts_len]);
    coap_option::encode(filter_and_redelta(options.iter().copied(), OptionClass::E), &mut sink);
  }

  if !payload.is_empty() {
    buf[1 + opts_len] = PAYLOAD_MARKER;
    buf[2 + opts_len..].copy_from_slice(payload);
  }

  buf
}

fn encode_options<'m>(options: impl IntoIterator<Item = NumberedOption<'m>>) -> Vec<u8> {
  let filtered: Vec<_> = filter_and_redelta(options, OptionClass::U).collect();
  let len = coap_option::encoded_len(filtered.iter().copied());
  let mut buf = std_alloc::vec![0u8; len];
  let mut sink = SliceSink::new(&mut buf);
  coap_option::encode(filtered, &mut sink);
  buf
}

/// Protect `message` (a plaintext CoAP request or response) into its OSCORE
/// form.
///
/// `original_request` is the request this message answers, used to recover
/// `request_kid`/`request_piv` for the external AAD (§4.10) — pass `None`
/// when protecting a fresh request, in which case this endpoint's own
/// `sender_id`/new Partial IV play that role instead.
///
/// `is_response` controls whether the outer message's code is overwritten
/// with [`OUTER_RESPONSE_CODE`] and whether the OSCORE option may not carry
/// a `kid_context`.
pub fn protect<S: SeqNumStore>(original_request: Option<&dyn CoapMessage>, message: &dyn CoapMessage,
                                is_response: bool, common: &CommonContext, sender: &mut SenderContext<S>)
                                -> Result<RawMessage, Error> {
  let mut seq = sender.seq.load();
  seq.increment().map_err(Error::from)?;
  sender.seq.store(seq);
  log::trace!("protect: sender sequence number incremented");

  let piv_stripped = seq.trimmed();
  let nonce = build_nonce(&sender.sender_id, piv_stripped, &common.common_iv)?;

  let (request_kid, request_piv): (Vec<u8>, Vec<u8>) = match original_request {
    | Some(req) => {
      let numbered = numbered_options(req)?;
      let oscore_value = numbered.iter()
                                 .find(|o| o.number == numbers::OSCORE)
                                 .map(|o| o.value)
                                 .ok_or(Error::Semantic(SemanticError::NoOscoreOption))?;
      let opt = UnprotectedOscoreOption::decode(oscore_value)?;
      (opt.kid.unwrap_or(&[]).to_vec(), opt.partial_iv.to_vec())
    },
    | None => (sender.sender_id.clone(), piv_stripped.to_vec()),
  };

  let numbered = numbered_options(message)?;
  let numbered = apply_proxy_uri_rewrite(numbered)?;

  let plaintext = build_plaintext(message.code(), &numbered, message.payload());

  let external = ExternalAad { aead_alg: common.aead_alg.cose_id(),
                                request_kid: &request_kid,
                                request_piv: &request_piv,
                                class_i_options: &[] };
  let external_bytes = external.to_vec();
  let enc_structure = EncStructure { external_aad: &external_bytes };
  let aad_bytes = enc_structure.to_vec();

  let ciphertext = aead::seal(&sender.sender_key, &nonce, &plaintext, &aad_bytes)?;
  log::debug!("protect: sealed {} byte plaintext into {} byte ciphertext", plaintext.len(), ciphertext.len());

  let oscore_opt = UnprotectedOscoreOption::new(piv_stripped, Some(&sender.sender_id), None)?;
  let mut oscore_opt_buf = std_alloc::vec![0u8; oscore_opt.encoded_len()];
  {
    let mut sink = SliceSink::new(&mut oscore_opt_buf);
    oscore_opt.encode(is_response, &mut sink).map_err(|e| match e {
                                                | oscore_msg::oscore_option::OscoreOptionError::Encoding(e) => Error::Encoding(e),
                                                | oscore_msg::oscore_option::OscoreOptionError::KidContextError => {
                                                  Error::Semantic(SemanticError::KidContextError)
                                                },
                                              })?;
  }

  let mut outer_numbered = numbered;
  outer_numbered.push(NumberedOption { number: numbers::OSCORE, value: &oscore_opt_buf });
  outer_numbered.sort_by_key(|o| o.number);

  let outer_options = encode_options(outer_numbered);

  Ok(RawMessage { version: message.version(),
                   ty: message.ty(),
                   token: message.token().to_vec(),
                   message_id: message.message_id(),
                   code: if is_response { OUTER_RESPONSE_CODE } else { message.code() },
                   options: outer_options,
                   payload: ciphertext })
}
