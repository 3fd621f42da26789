//! `Endpoint` (§5): bundles one Common/Sender/Recipient context behind a
//! single lock so that sequence-number increment, replay-window update, and
//! nonce/AEAD pairing form one atomic unit when `protect`/`unprotect` are
//! driven from more than one thread.
//!
//! `no_std` callers without the `std` feature do not get this wrapper —
//! `protect`/`unprotect` already take their contexts by `&`/`&mut`, so a
//! `no_std` host owns whatever locking its platform offers (§5: "An
//! implementation MAY invoke protect/unprotect from multiple threads only by
//! holding a per-endpoint lock").

use std::sync::Mutex;

use crate::context::{AtomicSeqNumStore, CommonContext, RecipientContext, SenderContext, SeqNumStore};
use crate::error::Error;
use crate::replay::{BitmapReplayWindow, ReplayWindow};
use crate::transport::{CoapMessage, RawMessage};

#[derive(Debug)]
struct Mutable<S: SeqNumStore, R: ReplayWindow> {
  sender: SenderContext<S>,
  recipient: RecipientContext<R>,
}

/// One OSCORE endpoint: an immutable [`CommonContext`] plus its mutable
/// sender/recipient state behind one [`Mutex`], so a single lock acquisition
/// covers the three operations §5 requires to be atomic together.
#[derive(Debug)]
pub struct Endpoint<S: SeqNumStore = AtomicSeqNumStore, R: ReplayWindow = BitmapReplayWindow<32>> {
  common: CommonContext,
  mutable: Mutex<Mutable<S, R>>,
}

impl<S: SeqNumStore, R: ReplayWindow> Endpoint<S, R> {
  /// Bundle already-derived contexts into one lockable endpoint.
  pub fn new(common: CommonContext, sender: SenderContext<S>, recipient: RecipientContext<R>) -> Self {
    Self { common, mutable: Mutex::new(Mutable { sender, recipient }) }
  }

  /// Protect `message`, incrementing this endpoint's sender sequence number
  /// and sealing under its freshly-built nonce, all under one lock
  /// acquisition.
  pub fn protect(&self, original_request: Option<&dyn CoapMessage>, message: &dyn CoapMessage,
                  is_response: bool)
                  -> Result<RawMessage, Error> {
    let mut mutable = self.mutable.lock().expect("oscore endpoint mutex poisoned");
    crate::protect::protect(original_request, message, is_response, &self.common, &mut mutable.sender)
  }

  /// Unprotect `inbound` against this endpoint's recipient context, checking
  /// and updating the replay window under the same lock acquisition that
  /// performs the AEAD open.
  pub fn unprotect(&self, inbound: &dyn CoapMessage) -> Result<RawMessage, Error> {
    let mut mutable = self.mutable.lock().expect("oscore endpoint mutex poisoned");
    crate::unprotect::unprotect(inbound, &self.common, &mut mutable.recipient)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Config;
  use crate::context::{derive_common_context, derive_recipient_context, derive_sender_context, PreEstablished};

  fn sample_request() -> RawMessage {
    RawMessage { version: 1, ty: 0, token: vec![0xaa], message_id: 1, code: 0x01, options: vec![], payload: b"hi".to_vec() }
  }

  #[test]
  fn protect_and_unprotect_through_one_lock() {
    let master_secret = [0u8; 16];
    let client_id = [0x01];
    let server_id = [0x02];

    let client_pre = PreEstablished { master_secret: &master_secret,
                                       master_salt: &[],
                                       sender_id: &client_id,
                                       recipient_id: &server_id,
                                       id_context: None,
                                       config: Config::default() };
    let server_pre = PreEstablished { master_secret: &master_secret,
                                       master_salt: &[],
                                       sender_id: &server_id,
                                       recipient_id: &client_id,
                                       id_context: None,
                                       config: Config::default() };

    let client_sender: SenderContext<AtomicSeqNumStore> = derive_sender_context(&client_pre).unwrap();
    let client_recipient: RecipientContext<BitmapReplayWindow<32>> = derive_recipient_context(&client_pre).unwrap();
    let client = Endpoint::new(derive_common_context(&client_pre).unwrap(), client_sender, client_recipient);

    let server_sender: SenderContext<AtomicSeqNumStore> = derive_sender_context(&server_pre).unwrap();
    let server_recipient: RecipientContext<BitmapReplayWindow<32>> = derive_recipient_context(&server_pre).unwrap();
    let server = Endpoint::new(derive_common_context(&server_pre).unwrap(), server_sender, server_recipient);

    let request = sample_request();
    let protected = client.protect(None, &request, false).unwrap();
    let unprotected = server.unprotect(&protected).unwrap();

    assert_eq!(unprotected.payload, request.payload);
  }
}
