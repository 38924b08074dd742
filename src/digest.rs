//! Built-in DS digest verifiers registered by [`crate::registry::Registry::with_defaults`].
//!
//! # Digest Algorithms
//! Per IANA's Delegation Signer (DS) Resource Record Digest Algorithms
//! registry (RFC 4034 / RFC 4509):
//!
//! |Value|Description|Status|
//! |-----|-----------|------|
//! |1|SHA-1|MANDATORY|
//! |2|SHA-256|MANDATORY|

use crate::registry::Digest;
use sha1::Sha1;
use sha2::{Digest as Sha2DigestTrait, Sha256};

/// SHA-1 (RFC 3658).
pub const SHA1: u8 = 1;
/// SHA-256 (RFC 4509).
pub const SHA256: u8 = 2;

pub struct Sha1Digest;

impl Digest for Sha1Digest {
    fn verify(&self, data: &[u8], expected: &[u8]) -> bool {
        use sha1::Digest as Sha1DigestTrait;
        let got = Sha1::digest(data);
        got.as_slice() == expected
    }
}

pub struct Sha256Digest;

impl Digest for Sha256Digest {
    fn verify(&self, data: &[u8], expected: &[u8]) -> bool {
        let got = Sha256::digest(data);
        got.as_slice() == expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha1_matches_known_digest() {
        // sha1("abc") = a9993e364706816aba3e25717850c26c9cd0d89
        let expected = hex_literal::hex!("a9993e364706816aba3e25717850c26c9cd0d89");
        assert!(Sha1Digest.verify(b"abc", &expected));
        assert!(!Sha1Digest.verify(b"abd", &expected));
    }

    #[test]
    fn sha256_matches_known_digest() {
        // sha256("abc") = ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad
        let expected =
            hex_literal::hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
        assert!(Sha256Digest.verify(b"abc", &expected));
    }
}
