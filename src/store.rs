//! The authenticated `(H(name), type) -> RRSet` map, including the trust
//! anchor bootstrap.
//!
//! Keys are hashed owner names rather than raw wire bytes so the map stays
//! a flat, fixed-width hash table regardless of name length; the hash is
//! computed over the *exact* wire bytes, so callers who want case-folded
//! lookups must fold before calling in (§3 of the design notes).

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::types::TYPE_DS;

/// Sentinel owner-name key for the trust anchor entry: a single ASCII space
/// (`0x20`). This is not a valid wire-format name (every real name either is
/// the root's single `0x00` byte or starts with a label-length octet that,
/// for a one-byte buffer, would have to be `0x00` too), so it can never
/// collide with a real DNS name's hash input.
pub const ANCHOR_NAME: &[u8] = b" ";

/// A persisted, authenticated RRSET summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RRSet {
    pub inception: u32,
    pub inserted: u64,
    pub fingerprint: [u8; 20],
}

impl RRSet {
    /// The zero triple `rrdata` returns for an absent entry.
    pub fn absent() -> Self {
        RRSet::default()
    }

    pub fn is_present(&self) -> bool {
        self.inserted > 0
    }
}

/// Hashes the exact wire bytes of an owner name into the store's key space.
pub fn hash_name(name_wire: &[u8]) -> [u8; 32] {
    let digest = Sha256::digest(name_wire);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// The store's fingerprint function: a truncated SHA-256 over the canonical
/// RR bytes a submission or proof covers. 20 bytes is enough to be
/// collision-resistant for this use (a content identifier compared for
/// equality, never a signature) while matching the RRSet record's declared
/// width.
pub fn fingerprint(data: &[u8]) -> [u8; 20] {
    let digest = Sha256::digest(data);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest[..20]);
    out
}

/// The flat `(name hash, type) -> RRSet` map plus the anchors byte string.
#[derive(Debug, Default)]
pub struct Store {
    entries: HashMap<([u8; 32], u16), RRSet>,
    anchors: Vec<u8>,
}

impl Store {
    /// Constructs the store and installs the anchor bootstrap entry:
    /// `(ANCHOR_NAME, DS) -> (inception=0, inserted=now, fingerprint=hash(anchors))`.
    pub fn bootstrap(anchors: &[u8], now: u64) -> Self {
        let mut store = Store {
            entries: HashMap::new(),
            anchors: anchors.to_vec(),
        };
        store.entries.insert(
            (hash_name(ANCHOR_NAME), TYPE_DS),
            RRSet {
                inception: 0,
                inserted: now.max(1),
                fingerprint: fingerprint(anchors),
            },
        );
        store
    }

    pub fn anchors(&self) -> &[u8] {
        &self.anchors
    }

    pub fn get(&self, name_hash: [u8; 32], dnstype: u16) -> RRSet {
        self.entries.get(&(name_hash, dnstype)).copied().unwrap_or_default()
    }

    pub fn put(&mut self, name_hash: [u8; 32], dnstype: u16, rrset: RRSet) {
        self.entries.insert((name_hash, dnstype), rrset);
    }

    pub fn delete(&mut self, name_hash: [u8; 32], dnstype: u16) {
        self.entries.remove(&(name_hash, dnstype));
    }
}
