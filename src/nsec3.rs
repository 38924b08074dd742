//! Built-in NSEC3 hashed-owner-name verifier registered by
//! [`crate::registry::Registry::with_defaults`].
//!
//! # NSEC3 hash algorithms
//! Per IANA's DNSSEC NSEC3 Hash Algorithms registry (RFC 5155 §2):
//!
//! |Value|Description|
//! |-----|-----------|
//! |0|Reserved|
//! |1|SHA-1|

use crate::registry::Nsec3Digest;
use sha1::{Digest, Sha1};

/// SHA-1 (RFC 5155 §2), the only hash algorithm the RFC defines.
pub const SHA1: u8 = 1;

pub struct Sha1Nsec3;

impl Nsec3Digest for Sha1Nsec3 {
    /// RFC 5155 §5: `IH(salt, x, 0) = H(x || salt)`,
    /// `IH(salt, x, k) = H(IH(salt, x, k-1) || salt)`, applied `iterations + 1`
    /// times total (the first hash plus `iterations` additional rounds).
    fn hash(&self, salt: &[u8], name_wire: &[u8], iterations: u16) -> [u8; 32] {
        let mut digest = Sha1::digest([name_wire, salt].concat());
        for _ in 0..iterations {
            digest = Sha1::digest([digest.as_slice(), salt].concat());
        }
        let mut word = [0u8; 32];
        word[..20].copy_from_slice(&digest);
        word
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_iterations_is_a_single_round() {
        let name = b"\x07example\x03com\x00";
        let salt = b"\xAA\xBB";
        let hasher = Sha1Nsec3;
        let got = hasher.hash(salt, name, 0);

        let mut expected_input = name.to_vec();
        expected_input.extend_from_slice(salt);
        let expected = Sha1::digest(&expected_input);
        assert_eq!(&got[..20], expected.as_slice());
    }

    #[test]
    fn additional_iterations_change_the_result() {
        let name = b"\x03www\x07example\x03com\x00";
        let hasher = Sha1Nsec3;
        let h0 = hasher.hash(b"", name, 0);
        let h1 = hasher.hash(b"", name, 1);
        assert_ne!(h0, h1);
    }
}
