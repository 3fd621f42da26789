//! CoAP option numbers referenced by the Class U/I partitioner (§4.7) and the
//! external interfaces section (§6).

/// `Uri-Host` — Class U.
pub const URI_HOST: u16 = 3;
/// `Observe` — Class U.
pub const OBSERVE: u16 = 6;
/// `Uri-Port` — Class U.
pub const URI_PORT: u16 = 7;
/// `Uri-Path` — Class E. Not itself a Class U option, but named because the
/// Proxy-Uri rewrite (§4.7 edge case) moves a request's path into this
/// option.
pub const URI_PATH: u16 = 11;
/// `OSCORE` (tentative number per the draft this was built against) — Class U.
pub const OSCORE: u16 = 9;
/// `Uri-Query` — Class E. Named for the same reason as [`URI_PATH`].
pub const URI_QUERY: u16 = 15;
/// `Proxy-Uri` — Class U.
pub const PROXY_URI: u16 = 35;
/// `Proxy-Scheme` — Class U.
pub const PROXY_SCHEME: u16 = 39;
/// `No-Response` — Class U.
pub const NO_RESPONSE: u16 = 258;

/// Every Class U option number (§4.7).
pub const CLASS_U: &[u16] = &[URI_HOST, OBSERVE, URI_PORT, OSCORE, PROXY_URI, PROXY_SCHEME, NO_RESPONSE];

/// Option numbers excluded from Class E (§4.7): everything not in this list
/// is Class E, including options unknown to this crate.
pub const CLASS_E_EXCLUDED: &[u16] = &[URI_HOST, URI_PORT, OSCORE, PROXY_URI, PROXY_SCHEME];
