use crate::registry::Algorithm;
use crate::types::dnskey_offset;
use rsa::pkcs1v15::Pkcs1v15Sign;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPublicKey};
use sha2::{Digest, Sha256};

/// RSA/SHA-256 signature verification (RFC 5702), keyed off the DNSKEY
/// public-key field encoded per RFC 3110: a one-byte exponent length (or,
/// if zero, a two-byte length followed by the real length), the exponent,
/// then the modulus filling the rest of the field.
pub struct RsaSha256;

impl RsaSha256 {
    pub fn new() -> Self {
        RsaSha256
    }
}

impl Default for RsaSha256 {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for RsaSha256 {
    fn verify(&self, key_rdata: &[u8], data: &[u8], signature: &[u8]) -> bool {
        // `key_rdata` is the full DNSKEY rdata (flags/protocol/algorithm then
        // the public-key field); skip the 4-byte header ourselves rather than
        // relying on the caller to have already sliced it off.
        if key_rdata.len() <= dnskey_offset::PUBLIC_KEY {
            return false;
        }
        let Some(pub_key) = parse_rfc3110_pubkey(&key_rdata[dnskey_offset::PUBLIC_KEY..]) else {
            return false;
        };
        let hashed = Sha256::digest(data);
        let scheme = Pkcs1v15Sign::new::<Sha256>();
        pub_key.verify(scheme, &hashed, signature).is_ok()
    }
}

fn parse_rfc3110_pubkey(pubkey: &[u8]) -> Option<RsaPublicKey> {
    if pubkey.is_empty() {
        return None;
    }
    let (exp_len, rest) = if pubkey[0] == 0 {
        if pubkey.len() < 3 {
            return None;
        }
        (u16::from_be_bytes([pubkey[1], pubkey[2]]) as usize, &pubkey[3..])
    } else {
        (pubkey[0] as usize, &pubkey[1..])
    };
    if rest.len() <= exp_len {
        return None;
    }
    let e = BigUint::from_bytes_be(&rest[..exp_len]);
    let n = BigUint::from_bytes_be(&rest[exp_len..]);
    RsaPublicKey::new(n, e).ok()
}
