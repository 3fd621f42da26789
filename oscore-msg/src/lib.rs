//! Wire format for OSCORE (RFC 8613): deterministic CBOR, the CoAP option
//! codec, the Class U/E/I partitioner, and the OSCORE option codec.
//!
//! This crate is the low-level half of the `oscore` workspace, the same way
//! `toad_msg` is the low-level half of `toad`: it is `no_std`-capable, does
//! no I/O, and every fallible operation returns a concrete error enum rather
//! than panicking.
//!
//! ## Two-pass sizing
//! Every encoder in this crate follows the "size then write" pattern: call
//! the `*_len` function to learn how many bytes are needed, allocate (or
//! borrow) a buffer of exactly that size, then call the matching `encode_*`
//! function. Both passes share the same code, parameterized over a [`Sink`],
//! so the two can never drift apart.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(not(test), forbid(missing_debug_implementations, unreachable_pub))]
#![cfg_attr(not(test), deny(unsafe_code, missing_copy_implementations))]
#![deny(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc as std_alloc;

/// External AAD & Enc_structure (§4.10)
pub mod aad;

/// Byte-buffer primitive: cursor and sizing/writing sink (§4.0 / component 1)
pub mod buf;

/// Deterministic CBOR encoder (§4.1 / component 2)
pub mod cbor;

/// CoAP option entry codec (§4.6 / component 7)
pub mod coap_option;

/// Shared error taxonomy for this crate's encoding-family failures (§7)
pub mod error;

/// CoAP option number constants referenced by §4.7 / §6
pub mod numbers;

/// Class U/E/I option partitioner and Proxy-Uri rewrite (§4.7 / component 8)
pub mod option_class;

/// Nonce construction (§4.9 / component 10)
pub mod nonce;

/// OSCORE option wire format (§4.8 / component 9)
pub mod oscore_option;

#[doc(inline)]
pub use aad::{EncStructure, ExternalAad};
#[doc(inline)]
pub use buf::Cursor;
#[doc(inline)]
pub use coap_option::CoapOption;
#[doc(inline)]
pub use error::{CborError, EncodingError, UriError};
#[doc(inline)]
pub use nonce::build_nonce;
#[doc(inline)]
pub use option_class::OptionClass;
#[doc(inline)]
pub use oscore_option::{OscoreOptionError, UnprotectedOscoreOption};
