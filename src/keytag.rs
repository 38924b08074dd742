//! DNSSEC keytag computation (RFC 4034 Appendix B) and the small canonical
//! helpers (label counting, wildcard detection) the engine needs alongside it.

use crate::wire::{Wire, WILDCARD_LABEL};

/// Computes the keytag of a DNSKEY RR over its full rdata (flags, protocol,
/// algorithm, public key), per RFC 4034 Appendix B: the rdata is summed as
/// a sequence of big-endian 16-bit words, ignoring carries out of 32 bits,
/// folded once, and truncated to 16 bits. The odd trailing byte (when the
/// rdata has odd length) is folded in as the high octet of a final word.
///
/// See `compute_keytag_legacy` for the bug-compatible variant that omits
/// this odd-byte handling (open question #1 in the design notes).
pub fn compute_keytag(rdata: &[u8]) -> u16 {
    let mut ac: u32 = 0;
    let mut i = 0;
    while i < rdata.len() {
        let word = if i + 1 < rdata.len() {
            u16::from_be_bytes([rdata[i], rdata[i + 1]])
        } else {
            u16::from_be_bytes([rdata[i], 0])
        };
        ac += word as u32;
        i += 2;
    }
    ac += ac >> 16;
    (ac & 0xFFFF) as u16
}

/// The anomalous variant matching the original "plain sum of 16-bit words"
/// source, which silently drops the final byte when `rdata.len()` is odd
/// instead of folding it in. Kept only for callers that must bit-for-bit
/// match that source; `compute_keytag` is the RFC-correct function and is
/// what the validation engine uses.
pub fn compute_keytag_legacy(rdata: &[u8]) -> u16 {
    let mut ac: u32 = 0;
    let mut i = 0;
    while i + 1 < rdata.len() {
        let word = u16::from_be_bytes([rdata[i], rdata[i + 1]]);
        ac += word as u32;
        i += 2;
    }
    ac += ac >> 16;
    (ac & 0xFFFF) as u16
}

/// Accepts a name as belonging to an RRSIG whose `labels` field claims
/// `labels` labels, per RFC 4035 §5.3.2: either the name's label count
/// matches exactly, or the name is a synthesized wildcard expansion
/// (`label_count == labels + 1` and the first two wire bytes are `01 2A`).
pub fn check_name_labels(wire: &Wire, name_offset: usize, labels: u8) -> crate::error::Result<bool> {
    let count = wire.label_count(name_offset)?;
    if count == labels {
        return Ok(true);
    }
    if count == labels.wrapping_add(1) {
        let first_two = wire.read_u16(name_offset)?;
        return Ok(first_two == WILDCARD_LABEL);
    }
    Ok(false)
}

/// Same check over a standalone name byte slice rather than an offset into
/// a larger buffer. An empty slice (the owner name `validate_rrs` returns
/// for an empty RRSET) has no wire encoding to walk, so it is treated as
/// the zero-label case directly rather than erroring.
pub fn check_name_labels_bytes(name: &[u8], labels: u8) -> crate::error::Result<bool> {
    let wire = Wire::new(name);
    if wire.is_empty() {
        return Ok(labels == 0);
    }
    check_name_labels(&wire, 0, labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keytag_even_length() {
        // Two 16-bit words: 0x0101 and 0x0302, sum = 0x0403, no fold needed.
        let rdata = [0x01, 0x01, 0x03, 0x02];
        assert_eq!(compute_keytag(&rdata), 0x0403);
    }

    #[test]
    fn keytag_odd_length_folds_trailing_byte() {
        let rdata = [0x01, 0x01, 0x03];
        // Trailing 0x03 becomes the high byte of a final word: 0x0300.
        assert_eq!(compute_keytag(&rdata), 0x0101 + 0x0300);
    }

    #[test]
    fn keytag_legacy_drops_trailing_byte() {
        let rdata = [0x01, 0x01, 0x03];
        assert_eq!(compute_keytag_legacy(&rdata), 0x0101);
    }

    #[test]
    fn check_name_labels_exact_and_wildcard() {
        // "example.com." -> 2 labels
        let mut name = vec![7];
        name.extend_from_slice(b"example");
        name.push(3);
        name.extend_from_slice(b"com");
        name.push(0);
        let wire = Wire::new(&name);
        assert!(check_name_labels(&wire, 0, 2).unwrap());
        assert!(!check_name_labels(&wire, 0, 1).unwrap());

        // "*.example.com." -> 3 labels on the wire, RRSIG claims 2 (wildcard)
        let mut wildcard = vec![1, b'*'];
        wildcard.extend_from_slice(&name);
        let wire = Wire::new(&wildcard);
        assert!(check_name_labels(&wire, 0, 2).unwrap());
    }

    #[test]
    fn check_name_labels_root_accepts_only_zero() {
        let root = [0u8];
        let wire = Wire::new(&root);
        assert!(check_name_labels(&wire, 0, 0).unwrap());
        assert!(!check_name_labels(&wire, 0, 1).unwrap());
    }
}
