//! Pluggable, owner-mutable indirection tables mapping DNSSEC
//! algorithm/digest-type/NSEC3-hash-algorithm numbers to verifiers.
//!
//! The validation engine never inlines cryptography: every signature check,
//! DS digest check, and NSEC3 hash computation goes through one of the three
//! traits below. [`Registry`] ships with the common defaults registered
//! (see `crate::algo`, `crate::digest`, `crate::nsec3`) but every slot can
//! be overridden by the controlling admin via [`crate::Oracle::set_algorithm`]
//! and friends.

use std::collections::HashMap;

/// Verifies a DNSSEC signature (RRSIG-covered data) against a DNSKEY's
/// public key material. `key_rdata` is the full DNSKEY rdata (flags,
/// protocol, algorithm, public key); `data` is the signed input.
pub trait Algorithm {
    fn verify(&self, key_rdata: &[u8], data: &[u8], signature: &[u8]) -> bool;
}

/// Computes a digest over `data` and compares it to `expected`.
pub trait Digest {
    fn verify(&self, data: &[u8], expected: &[u8]) -> bool;
}

/// RFC 5155 iterated hashed-owner-name computation for NSEC3.
pub trait Nsec3Digest {
    fn hash(&self, salt: &[u8], name_wire: &[u8], iterations: u16) -> [u8; 32];
}

/// The three independent algorithm/digest/hash tables. A missing
/// registration for a required id is not fatal by itself: the relevant
/// `verify`/`hash` call simply returns `false`/a zero word, and the caller
/// (the validation engine) turns that into the appropriate `OracleError`.
#[derive(Default)]
pub struct Registry {
    algorithms: HashMap<u8, Box<dyn Algorithm>>,
    digests: HashMap<u8, Box<dyn Digest>>,
    nsec3_digests: HashMap<u8, Box<dyn Nsec3Digest>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// A registry pre-populated with this crate's default verifiers: RSA/SHA-256
    /// (algorithm 8) and DSA/SHA-1 (algorithm 3) for signatures, SHA-1 and
    /// SHA-256 (digest types 1 and 2) for DS digests, and SHA-1 (hash
    /// algorithm 1) for NSEC3 hashed owner names.
    pub fn with_defaults() -> Self {
        let mut reg = Registry::new();
        reg.set_algorithm(crate::algo::RSASHA256, Box::new(crate::algo::RsaSha256::new()));
        reg.set_algorithm(crate::algo::DSA_SHA1, Box::new(crate::algo::DsaSha1::new()));
        reg.set_digest(crate::digest::SHA1, Box::new(crate::digest::Sha1Digest));
        reg.set_digest(crate::digest::SHA256, Box::new(crate::digest::Sha256Digest));
        reg.set_nsec3_digest(crate::nsec3::SHA1, Box::new(crate::nsec3::Sha1Nsec3));
        reg
    }

    pub fn set_algorithm(&mut self, id: u8, verifier: Box<dyn Algorithm>) {
        self.algorithms.insert(id, verifier);
    }

    pub fn set_digest(&mut self, id: u8, verifier: Box<dyn Digest>) {
        self.digests.insert(id, verifier);
    }

    pub fn set_nsec3_digest(&mut self, id: u8, verifier: Box<dyn Nsec3Digest>) {
        self.nsec3_digests.insert(id, verifier);
    }

    pub fn verify_signature(&self, alg: u8, key_rdata: &[u8], data: &[u8], sig: &[u8]) -> bool {
        match self.algorithms.get(&alg) {
            Some(v) => v.verify(key_rdata, data, sig),
            None => false,
        }
    }

    pub fn verify_digest(&self, digest_type: u8, data: &[u8], expected: &[u8]) -> bool {
        match self.digests.get(&digest_type) {
            Some(v) => v.verify(data, expected),
            None => false,
        }
    }

    pub fn nsec3_hash(&self, hash_alg: u8, salt: &[u8], name_wire: &[u8], iterations: u16) -> Option<[u8; 32]> {
        self.nsec3_digests.get(&hash_alg).map(|v| v.hash(salt, name_wire, iterations))
    }
}
