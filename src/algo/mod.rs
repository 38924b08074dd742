//! Built-in signature verifiers registered by [`crate::registry::Registry::with_defaults`].
//!
//! Algorithm numbers per IANA's DNS Security Algorithm Numbers registry
//! (RFC 4034 Appendix A.1).

mod dsa_sha1;
mod rsa_sha256;

pub use dsa_sha1::DsaSha1;
pub use rsa_sha256::RsaSha256;

/// DSA/SHA-1 (RFC 2536). OPTIONAL per RFC 4034.
pub const DSA_SHA1: u8 = 3;

/// RSA/SHA-256 (RFC 5702). MANDATORY per RFC 5702.
pub const RSASHA256: u8 = 8;
