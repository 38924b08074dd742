use crate::registry::Algorithm;
use crate::types::dnskey_offset;
use dsa::{BigUint, Components, VerifyingKey};
use sha1::{Digest, Sha1};
use signature::hazmat::PrehashVerifier;

/// DSA/SHA-1 (RFC 2536), keyed off the DNSKEY public-key field layout:
/// `T(1) | Q(20) | P(64+8T) | G(64+8T) | Y(64+8T)`.
pub struct DsaSha1;

impl DsaSha1 {
    pub fn new() -> Self {
        DsaSha1
    }
}

impl Default for DsaSha1 {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for DsaSha1 {
    fn verify(&self, key_rdata: &[u8], data: &[u8], signature: &[u8]) -> bool {
        // `key_rdata` is the full DNSKEY rdata; skip the 4-byte
        // flags/protocol/algorithm header ourselves.
        if key_rdata.len() <= dnskey_offset::PUBLIC_KEY {
            return false;
        }
        let Some(verifying_key) = parse_rfc2536_pubkey(&key_rdata[dnskey_offset::PUBLIC_KEY..]) else {
            return false;
        };
        let Some(sig) = parse_rfc2536_signature(signature) else {
            return false;
        };
        let hashed = Sha1::digest(data);
        verifying_key.verify_prehash(&hashed, &sig).is_ok()
    }
}

fn parse_rfc2536_pubkey(pubkey: &[u8]) -> Option<VerifyingKey> {
    if pubkey.is_empty() {
        return None;
    }
    let t = pubkey[0] as usize;
    let unit = 64 + 8 * t;
    let q_off = 1;
    let p_off = q_off + 20;
    let g_off = p_off + unit;
    let y_off = g_off + unit;
    if pubkey.len() < y_off + unit {
        return None;
    }
    let q = BigUint::from_bytes_be(&pubkey[q_off..q_off + 20]);
    let p = BigUint::from_bytes_be(&pubkey[p_off..p_off + unit]);
    let g = BigUint::from_bytes_be(&pubkey[g_off..g_off + unit]);
    let y = BigUint::from_bytes_be(&pubkey[y_off..y_off + unit]);

    let components = Components::from_components(p, q, g).ok()?;
    VerifyingKey::from_components(components, y).ok()
}

/// RFC 2536 SIG rdata signature layout: `T(1) | R(20) | S(20)`.
fn parse_rfc2536_signature(sig: &[u8]) -> Option<dsa::Signature> {
    if sig.len() != 41 {
        return None;
    }
    let r = BigUint::from_bytes_be(&sig[1..21]);
    let s = BigUint::from_bytes_be(&sig[21..41]);
    dsa::Signature::from_components(r, s).ok()
}
