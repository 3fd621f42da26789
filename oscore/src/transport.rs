//! The transport collaborator (§6): an opaque CoAP message interface. The
//! core only cares about the wire-level option byte sequence and the
//! payload; everything else (retries, blocking, packet assembly) is the
//! host's problem.

use std_alloc::vec::Vec;

/// A CoAP message as the OSCORE core needs to see it: header fields, the
/// already-encoded option sequence, and the payload.
///
/// Scoped down from `toad_msg::Message` to exactly what protect/unprotect
/// touch — this core does not need retry/blocking semantics from a full
/// CoAP runtime.
pub trait CoapMessage {
  /// CoAP version (always 1 on the wire today).
  fn version(&self) -> u8;

  /// Message type: 0=CON, 1=NON, 2=ACK, 3=RST.
  fn ty(&self) -> u8;

  /// The message token, 0-8 bytes.
  fn token(&self) -> &[u8];

  /// The message ID.
  fn message_id(&self) -> u16;

  /// The method/response code.
  fn code(&self) -> u8;

  /// The already-encoded CoAP option sequence (no payload marker, no
  /// payload) as parsed by [`oscore_msg::coap_option::Options`].
  fn options_bytes(&self) -> &[u8];

  /// The message payload, empty if none.
  fn payload(&self) -> &[u8];
}

/// An owned [`CoapMessage`] implementation, returned by
/// [`crate::protect::protect`]/[`crate::unprotect::unprotect`] and usable
/// directly as a fixture in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
  /// See [`CoapMessage::version`].
  pub version: u8,
  /// See [`CoapMessage::ty`].
  pub ty: u8,
  /// See [`CoapMessage::token`].
  pub token: Vec<u8>,
  /// See [`CoapMessage::message_id`].
  pub message_id: u16,
  /// See [`CoapMessage::code`].
  pub code: u8,
  /// See [`CoapMessage::options_bytes`].
  pub options: Vec<u8>,
  /// See [`CoapMessage::payload`].
  pub payload: Vec<u8>,
}

impl CoapMessage for RawMessage {
  fn version(&self) -> u8 {
    self.version
  }

  fn ty(&self) -> u8 {
    self.ty
  }

  fn token(&self) -> &[u8] {
    &self.token
  }

  fn message_id(&self) -> u16 {
    self.message_id
  }

  fn code(&self) -> u8 {
    self.code
  }

  fn options_bytes(&self) -> &[u8] {
    &self.options
  }

  fn payload(&self) -> &[u8] {
    &self.payload
  }
}
