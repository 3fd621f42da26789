//! The unprotect pipeline (§4.12): OSCORE message → plaintext CoAP message.

use std_alloc::vec::Vec;

use oscore_msg::aad::{EncStructure, ExternalAad};
use oscore_msg::coap_option::{self, Options, PAYLOAD_MARKER};
use oscore_msg::option_class::{numbered, NumberedOption};
use oscore_msg::oscore_option::UnprotectedOscoreOption;
use oscore_msg::{build_nonce, numbers, CoapOption};

use crate::aead;
use crate::context::{CommonContext, RecipientContext};
use crate::error::{CryptoError, Error, SemanticError};
use crate::replay::ReplayWindow;
use crate::transport::{CoapMessage, RawMessage};

fn numbered_options<'m>(msg: &'m dyn CoapMessage) -> Result<Vec<NumberedOption<'m>>, Error> {
  let decoded: Vec<_> = Options::new(msg.options_bytes()).collect::<Result<_, _>>()?;
  Ok(numbered(decoded).collect())
}

fn redelta<'a>(mut sorted: Vec<NumberedOption<'a>>) -> Vec<CoapOption<'a>> {
  sorted.sort_by_key(|o| o.number);
  let mut prev = 0u16;
  sorted.into_iter()
        .map(|o| {
          let delta = o.number - prev;
          prev = o.number;
          CoapOption { delta, value: o.value }
        })
        .collect()
}

/// Unprotect an inbound OSCORE message into its plaintext CoAP form,
/// checking it against `common`/`recipient`.
pub fn unprotect<R: ReplayWindow>(inbound: &dyn CoapMessage, common: &CommonContext,
                                   recipient: &mut RecipientContext<R>)
                                   -> Result<RawMessage, Error> {
  let outer_numbered = numbered_options(inbound)?;

  let oscore_value = outer_numbered.iter()
                                    .find(|o| o.number == numbers::OSCORE)
                                    .map(|o| o.value)
                                    .ok_or(Error::Semantic(SemanticError::NoOscoreOption))?;
  let oscore_opt = UnprotectedOscoreOption::decode(oscore_value)?;

  if !recipient.replay_window.accepts(oscore_opt.partial_iv) {
    log::warn!("unprotect: partial iv rejected by replay window");
    return Err(Error::Crypto(CryptoError::ReplayRejected));
  }

  let kid = oscore_opt.kid.ok_or(Error::Semantic(SemanticError::InvalidKid))?;
  if kid != recipient.recipient_id.as_slice() {
    log::warn!("unprotect: kid did not match recipient id");
    return Err(Error::Semantic(SemanticError::InvalidKid));
  }

  let nonce = build_nonce(kid, oscore_opt.partial_iv, &common.common_iv)?;

  let external = ExternalAad { aead_alg: common.aead_alg.cose_id(),
                                request_kid: kid,
                                request_piv: oscore_opt.partial_iv,
                                class_i_options: &[] };
  let external_bytes = external.to_vec();
  let enc_structure = EncStructure { external_aad: &external_bytes };
  let aad_bytes = enc_structure.to_vec();

  let plaintext = aead::open(&recipient.recipient_key, &nonce, inbound.payload(), &aad_bytes)?;
  recipient.replay_window.insert(oscore_opt.partial_iv);
  log::debug!("unprotect: verified {} byte ciphertext", inbound.payload().len());

  let code = *plaintext.first().ok_or(Error::Semantic(SemanticError::PayloadNoPayloadMarker))?;
  let rest = &plaintext[1..];

  let (_, options_end) = coap_option::decode_sizing(rest)?;

  let inner_payload = match rest.get(options_end) {
    | Some(&PAYLOAD_MARKER) => &rest[options_end + 1..],
    | Some(_) => return Err(Error::Semantic(SemanticError::PayloadNoPayloadMarker)),
    | None => &rest[options_end..],
  };

  let inner_class_e: Vec<_> = Options::new(&rest[..options_end]).collect::<Result<_, _>>()?;
  let inner_numbered: Vec<_> = numbered(inner_class_e).collect();

  let outer_class_u: Vec<_> = outer_numbered.into_iter().filter(|o| o.number != numbers::OSCORE).collect();

  let mut combined = outer_class_u;
  combined.extend(inner_numbered);
  let merged_options = redelta(combined);

  let opts_len = coap_option::encoded_len(merged_options.iter().copied());
  let mut options_buf = std_alloc::vec![0u8; opts_len];
  {
    let mut sink = oscore_msg::buf::SliceSink::new(&mut options_buf);
    coap_option::encode(merged_options, &mut sink);
  }

  Ok(RawMessage { version: inbound.version(),
                   ty: inbound.ty(),
                   token: inbound.token().to_vec(),
                   message_id: inbound.message_id(),
                   code,
                   options: options_buf,
                   payload: inner_payload.to_vec() })
}
