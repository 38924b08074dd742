//! The validation engine: the state machine that ties the wire codec, RR
//! iterator, keytag/canonical helpers, registry and store together.
//!
//! [`Oracle`] is a plain struct owned by its caller. "Single-threaded,
//! transactional" (§5 of the design notes) falls out of ordinary Rust
//! borrowing: every mutating entry point takes `&mut self`, so the borrow
//! checker statically rules out concurrent mutation and any suspension
//! point mid-call. A caller that needs the oracle shared across threads
//! wraps it in a `Mutex<Oracle>` at the application layer; this module
//! takes no position on that.

use crate::error::{OracleError, Result};
use crate::events::OracleEvent;
use crate::keytag;
use crate::registry::{Algorithm, Digest, Nsec3Digest, Registry};
use crate::rr_iter::{RrIter, RrSlice};
use crate::store::{fingerprint, hash_name, RRSet, Store, ANCHOR_NAME};
use crate::types::{dnskey_offset, ds_offset, rrsig_offset, DNSKEY_ZONE_KEY_FLAG};
use crate::types::{CLASS_IN, TYPE_DNSKEY, TYPE_DS, TYPE_NSEC, TYPE_NSEC3};
use crate::wire::Wire;

/// The RRSIG fixed-prefix fields read out of `input`/`nsec` (RFC 4034 §3.1).
/// The signer name and the covered RRSET itself are kept as separate byte
/// slices by the caller rather than folded in here.
struct RrsigPrefix {
    type_covered: u16,
    algorithm: u8,
    labels: u8,
    expiration: u32,
    inception: u32,
    keytag: u16,
}

/// The wire-format root name: a single zero-length-label (terminator) byte.
const ROOT_NAME: &[u8] = &[0u8];

/// The store key a `proof` RRSET is looked up under: `hash(proof's own
/// owner name)`, read out of the proof bytes themselves (same as every
/// ordinary submission is keyed by its own owner name). The one exception
/// is the root trust-anchor DS RRSET, which never gets keyed by
/// `hash(root)` — it lives under the [`ANCHOR_NAME`] sentinel precisely so
/// an ordinary submission (which can only ever target a real wire-format
/// name) can never overwrite it (design notes, open question #4).
fn proof_lookup_key(proof_name: &[u8], proof_type: u16) -> [u8; 32] {
    if proof_name == ROOT_NAME && proof_type == TYPE_DS {
        hash_name(ANCHOR_NAME)
    } else {
        hash_name(proof_name)
    }
}

/// Byte-for-byte wire-format name equality, routed through [`Wire::equals`]
/// (§4.1's codec contract) rather than an ad-hoc slice comparison — `a` and
/// `b` are each treated as their own zero-offset buffer.
fn names_equal(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && Wire::new(a).equals(0, &Wire::new(b), 0, a.len()).unwrap_or(false)
}

/// True iff `suffix` is `name` itself or an ancestor-zone suffix of it at a
/// genuine label boundary, per RFC 4035 §5.3.2 (the RRSIG signer name must
/// be an ancestor of the covered owner name). A raw byte-string tail match
/// is not enough: it can land inside a label's content rather than at a
/// length-byte boundary.
fn is_label_aligned_suffix(name: &[u8], suffix: &[u8]) -> bool {
    if suffix.len() > name.len() {
        return false;
    }
    let wire = Wire::new(name);
    let mut pos = 0;
    loop {
        if name.len() - pos == suffix.len() {
            return names_equal(&name[pos..], suffix);
        }
        let Ok(label_len) = wire.read_u8(pos) else { return false };
        if label_len == 0 || label_len as usize >= 0xC0 {
            return false;
        }
        pos += 1 + label_len as usize;
        if pos > name.len() {
            return false;
        }
    }
}

/// Best-effort owner-name length for entry-point debug logging: locates the
/// covered RRSET's owner name (signer name, then the first name in `rrs`)
/// without otherwise validating `input`. Returns `None` if `input` is too
/// malformed to even walk that far; the subsequent real validation call
/// reports the precise error in that case.
fn owner_name_length(wire: &Wire) -> Option<usize> {
    let signer_name_len = wire.name_length(rrsig_offset::SIGNER_NAME).ok()?;
    let rrs_offset = rrsig_offset::SIGNER_NAME + signer_name_len;
    wire.name_length(rrs_offset).ok()
}

fn read_rrsig_prefix(wire: &Wire) -> Result<RrsigPrefix> {
    Ok(RrsigPrefix {
        type_covered: wire.read_u16(rrsig_offset::TYPE_COVERED)?,
        algorithm: wire.read_u8(rrsig_offset::ALGORITHM)?,
        labels: wire.read_u8(rrsig_offset::LABELS)?,
        expiration: wire.read_u32(rrsig_offset::EXPIRATION)?,
        inception: wire.read_u32(rrsig_offset::INCEPTION)?,
        keytag: wire.read_u16(rrsig_offset::KEY_TAG)?,
    })
}

/// Iterates every RR in `rrs`, requiring class IN and `typecovered` for all
/// of them and byte-identical owner names across the set. Returns the
/// shared owner name, or an empty slice if `rrs` contains no RRs at all
/// (the empty-RRSET boundary case: `check_name_labels_bytes` then only
/// accepts a `labels` field of 0).
fn validate_rrs<'a>(rrs: &'a [u8], typecovered: u16) -> Result<&'a [u8]> {
    let mut name: Option<&'a [u8]> = None;
    let mut cursor = RrIter::new(rrs, 0);
    while let Some((rr, next)) = cursor.next()? {
        if rr.class != CLASS_IN {
            return Err(OracleError::UnsupportedClass(rr.class));
        }
        match name {
            None => name = Some(rr.name()),
            Some(n) if names_equal(n, rr.name()) => {}
            Some(_) => return Err(OracleError::NameMismatch("owner names disagree across the RRSET")),
        }
        if rr.dnstype != typecovered {
            return Err(OracleError::TypeMismatch { expected: typecovered, actual: rr.dnstype });
        }
        cursor = next;
    }
    Ok(name.unwrap_or(&rrs[0..0]))
}

/// Owned by the embedder: constructed once with the trust anchors and an
/// admin identity, then called for every submission/deletion/admin
/// mutation over its lifetime. Config-free beyond that — see `cmd/` for a
/// binary that layers TOML configuration and `tracing-subscriber` on top.
pub struct Oracle {
    store: Store,
    registry: Registry,
    admin: String,
}

impl Oracle {
    /// `now` is the wall-clock second used to stamp the anchor bootstrap
    /// entry's `inserted` field; every later call takes its own `now` so
    /// the oracle itself holds no clock.
    pub fn new(anchors: &[u8], now: u64, admin: impl Into<String>) -> Self {
        Oracle {
            store: Store::bootstrap(anchors, now),
            registry: Registry::with_defaults(),
            admin: admin.into(),
        }
    }

    pub fn anchors(&self) -> &[u8] {
        self.store.anchors()
    }

    /// Pure lookup. Returns the zero triple when absent (§4.6).
    pub fn rrdata(&self, dnstype: u16, name: &[u8]) -> (u32, u64, [u8; 20]) {
        let rr = self.store.get(hash_name(name), dnstype);
        (rr.inception, rr.inserted, rr.fingerprint)
    }

    fn require_admin(&self, caller: &str) -> Result<()> {
        if caller != self.admin {
            return Err(OracleError::Unauthorized);
        }
        Ok(())
    }

    pub fn set_algorithm(&mut self, caller: &str, id: u8, verifier: Box<dyn Algorithm>) -> Result<OracleEvent> {
        self.require_admin(caller)?;
        self.registry.set_algorithm(id, verifier);
        tracing::info!(id, identity = caller, "AlgorithmUpdated");
        Ok(OracleEvent::AlgorithmUpdated { id, identity: caller.to_string() })
    }

    pub fn set_digest(&mut self, caller: &str, id: u8, verifier: Box<dyn Digest>) -> Result<OracleEvent> {
        self.require_admin(caller)?;
        self.registry.set_digest(id, verifier);
        tracing::info!(id, identity = caller, "DigestUpdated");
        Ok(OracleEvent::DigestUpdated { id, identity: caller.to_string() })
    }

    pub fn set_nsec3_digest(&mut self, caller: &str, id: u8, verifier: Box<dyn Nsec3Digest>) -> Result<OracleEvent> {
        self.require_admin(caller)?;
        self.registry.set_nsec3_digest(id, verifier);
        tracing::info!(id, identity = caller, "Nsec3DigestUpdated");
        Ok(OracleEvent::Nsec3DigestUpdated { id, identity: caller.to_string() })
    }

    /// `input` is the RRSIG fixed prefix + signer name (no signature bytes)
    /// followed by the canonicalised covered RRSET; `proof` is a
    /// previously-trusted DNSKEY or DS RRSET. Emits `RRSetUpdated` on a
    /// real state change; returns `Ok(None)` on an idempotent no-op.
    pub fn submit_rrset(&mut self, now: u64, input: &[u8], sig: &[u8], proof: &[u8]) -> Result<Option<OracleEvent>> {
        let wire = Wire::new(input);
        let type_covered = wire.read_u16(rrsig_offset::TYPE_COVERED).unwrap_or(0);
        let owner_name_len = owner_name_length(&wire).unwrap_or(0);
        tracing::debug!(owner_name_len, type_covered, "submit_rrset");
        let outcome = self.submit_rrset_inner(now, input, sig, proof);
        if let Err(ref e) = outcome {
            tracing::warn!(error = %e, "submit_rrset rejected");
        }
        outcome
    }

    fn submit_rrset_inner(
        &mut self,
        now: u64,
        input: &[u8],
        sig: &[u8],
        proof: &[u8],
    ) -> Result<Option<OracleEvent>> {
        // `now` truncates to u32 for the inception/expiration comparison,
        // same plain-comparison choice as the rest of the time window logic
        // (see the RFC 1982 open question in the design notes).
        let now32 = now as u32;
        let (name, rrs) = self.validate_signed_set(input, sig, proof, now32)?;
        let prefix = read_rrsig_prefix(&Wire::new(input))?;

        let name_hash = hash_name(name);
        let stored = self.store.get(name_hash, prefix.type_covered);
        if stored.is_present() && prefix.inception < stored.inception {
            return Err(OracleError::ReplayRejected { incoming: prefix.inception, stored: stored.inception });
        }

        let new_fingerprint = fingerprint(rrs);
        if stored.is_present() && stored.fingerprint == new_fingerprint {
            return Ok(None);
        }

        self.store.put(
            name_hash,
            prefix.type_covered,
            RRSet { inception: prefix.inception, inserted: now, fingerprint: new_fingerprint },
        );
        tracing::info!(name_len = name.len(), rrs_len = rrs.len(), type_covered = prefix.type_covered, "RRSetUpdated");
        Ok(Some(OracleEvent::RRSetUpdated { name: name.to_vec(), rrs: rrs.to_vec() }))
    }

    /// Deletes `(delete_name, delete_type)` using an NSEC or NSEC3
    /// non-existence proof covering that name/type. Processes only the
    /// first RR of `nsec`'s covered RRSET, matching the anomalous source
    /// behavior called out in the design notes' open question #3 — a
    /// multi-RR NSEC RRSET would silently ignore everything past the
    /// first record.
    pub fn delete_rrset(
        &mut self,
        now: u64,
        delete_type: u16,
        delete_name: &[u8],
        nsec: &[u8],
        sig: &[u8],
        proof: &[u8],
    ) -> Result<()> {
        tracing::debug!(owner_name_len = delete_name.len(), type_covered = delete_type, "delete_rrset");
        let outcome = self.delete_rrset_inner(now, delete_type, delete_name, nsec, sig, proof);
        if let Err(ref e) = outcome {
            tracing::warn!(error = %e, "delete_rrset rejected");
        }
        outcome
    }

    fn delete_rrset_inner(
        &mut self,
        now: u64,
        delete_type: u16,
        delete_name: &[u8],
        nsec: &[u8],
        sig: &[u8],
        proof: &[u8],
    ) -> Result<()> {
        let now32 = now as u32;
        let (nsec_name, rrs) = self.validate_signed_set(nsec, sig, proof, now32)?;
        let nsec_prefix = read_rrsig_prefix(&Wire::new(nsec))?;

        let name_hash = hash_name(delete_name);
        let stored = self.store.get(name_hash, delete_type);
        if stored.is_present() && stored.inception > nsec_prefix.inception {
            return Err(OracleError::ReplayRejected { incoming: nsec_prefix.inception, stored: stored.inception });
        }

        let mut cursor = RrIter::new(rrs, 0);
        let Some((rr, _rest)) = cursor.next()? else {
            return Err(OracleError::DenialProofFailed("empty NSEC/NSEC3 rrset"));
        };
        match rr.dnstype {
            TYPE_NSEC => self.check_nsec_name(&rr, nsec_name, delete_name, delete_type)?,
            TYPE_NSEC3 => self.check_nsec3_name(&rr, nsec_name, delete_name, delete_type)?,
            other => return Err(OracleError::UnrecognizedRecordType(other)),
        }

        self.store.delete(name_hash, delete_type);
        tracing::info!(delete_type, "rrset deleted via denial-of-existence proof");
        Ok(())
    }

    /// Reads the signer name out of `input`, checks it against a stored
    /// trust entry, parses the covered RRSET, checks labels, verifies the
    /// signature, and enforces the validity time window. Returns the
    /// covered RRSET's owner name and the RRSET bytes themselves.
    fn validate_signed_set<'a>(
        &self,
        input: &'a [u8],
        sig: &[u8],
        proof: &[u8],
        now: u32,
    ) -> Result<(&'a [u8], &'a [u8])> {
        let wire = Wire::new(input);
        let signer_name_len = wire.name_length(rrsig_offset::SIGNER_NAME)?;
        let signer_name = wire.substring(rrsig_offset::SIGNER_NAME, signer_name_len)?;

        let proof_type = self.valid_proof(proof)?;
        let prefix = read_rrsig_prefix(&wire)?;

        let rrs_offset = rrsig_offset::SIGNER_NAME + signer_name_len;
        let rrs = wire.substring(rrs_offset, wire.len() - rrs_offset)?;

        let name = validate_rrs(rrs, prefix.type_covered)?;
        if !keytag::check_name_labels_bytes(name, prefix.labels)? {
            return Err(OracleError::NameMismatch("RRSIG labels field disagrees with the owner name's label count"));
        }

        self.verify_signature(name, input, sig, proof, signer_name, proof_type, &prefix)?;

        // Strict inequalities, matching the source: no RFC 1982 serial
        // arithmetic (design notes, open question #2).
        // TODO: switch to RFC 1982 serial-number comparison once a wraparound
        // policy is decided; plain u32 comparison mishandles `now` near 2^32.
        if prefix.expiration <= now || prefix.inception >= now {
            return Err(OracleError::TimeWindow { inception: prefix.inception, expiration: prefix.expiration, now });
        }

        Ok((name, rrs))
    }

    /// Checks that `proof`'s own owner name and embedded record type match a
    /// stored trusted entry whose fingerprint equals `hash20(proof)`.
    /// Returns the proof's record type (DS or DNSKEY) on success.
    ///
    /// The owner name and type come from `proof` itself (its first RR's
    /// name, then the type field right after), the same way every ordinary
    /// submission is keyed by its own RRSET's owner name — not from the
    /// RRSIG's signer name. Downstream, `verify_with_known_key` and
    /// `verify_with_ds` independently require the keys/records inside
    /// `proof` to actually belong to the signer's zone, so this lookup does
    /// not need to duplicate that check.
    fn valid_proof(&self, proof: &[u8]) -> Result<u16> {
        let proof_wire = Wire::new(proof);
        let name_len = proof_wire.name_length(0)?;
        let proof_name = proof_wire.substring(0, name_len)?;
        let proof_type = proof_wire.read_u16(name_len)?;

        let stored = self.store.get(proof_lookup_key(proof_name, proof_type), proof_type);
        if !stored.is_present() || stored.fingerprint != fingerprint(proof_wire.as_slice()) {
            return Err(OracleError::NoTrust);
        }
        Ok(proof_type)
    }

    fn verify_signature(
        &self,
        name: &[u8],
        data: &[u8],
        sig: &[u8],
        proof: &[u8],
        signer_name: &[u8],
        proof_type: u16,
        prefix: &RrsigPrefix,
    ) -> Result<()> {
        if !is_label_aligned_suffix(name, signer_name) {
            return Err(OracleError::NameMismatch("RRSIG signer name is not a suffix of the owner name"));
        }
        match proof_type {
            TYPE_DS => {
                let first_rr_offset = rrsig_offset::SIGNER_NAME + signer_name.len();
                self.verify_with_ds(data, sig, first_rr_offset, proof, prefix)
            }
            TYPE_DNSKEY => self.verify_with_known_key(data, sig, proof, signer_name, prefix),
            other => Err(OracleError::UnsupportedProofType(other)),
        }
    }

    /// Tries every DNSKEY RR in `proof` whose owner name matches
    /// `signer_name`; succeeds on the first one whose signature validates.
    fn verify_with_known_key(
        &self,
        data: &[u8],
        sig: &[u8],
        proof: &[u8],
        signer_name: &[u8],
        prefix: &RrsigPrefix,
    ) -> Result<()> {
        let mut cursor = RrIter::new(proof, 0);
        while let Some((rr, next)) = cursor.next()? {
            cursor = next;
            if rr.dnstype != TYPE_DNSKEY || !names_equal(rr.name(), signer_name) {
                continue;
            }
            if self.verify_signature_with_key(rr.rdata(), prefix.algorithm, prefix.keytag, data, sig).is_ok() {
                return Ok(());
            }
        }
        Err(OracleError::SignatureFailed)
    }

    /// Walks the DNSKEY RRs covered by `data` starting at `offset`. Every
    /// RR encountered there must be a DNSKEY — a non-DNSKEY RR in that
    /// region is a format error, not merely a skipped candidate. The first
    /// DNSKEY whose signature validates is checked against `proof` (a DS
    /// RRSET); that single check's result is final, successful or not.
    fn verify_with_ds(&self, data: &[u8], sig: &[u8], offset: usize, proof: &[u8], prefix: &RrsigPrefix) -> Result<()> {
        let mut cursor = RrIter::new(data, offset);
        loop {
            let Some((rr, next)) = cursor.next()? else {
                return Err(OracleError::SignatureFailed);
            };
            if rr.dnstype != TYPE_DNSKEY {
                return Err(OracleError::TypeMismatch { expected: TYPE_DNSKEY, actual: rr.dnstype });
            }
            if self.verify_signature_with_key(rr.rdata(), prefix.algorithm, prefix.keytag, data, sig).is_ok() {
                return self.verify_key_with_ds(rr.name(), rr.rdata(), prefix.keytag, prefix.algorithm, proof);
            }
            cursor = next;
        }
    }

    /// Pre-checks (protocol, algorithm, keytag, zone-key flag) then
    /// delegates to the registered [`Algorithm`] verifier for `alg`.
    fn verify_signature_with_key(
        &self,
        key_rdata: &[u8],
        alg: u8,
        keytag_expected: u16,
        data: &[u8],
        sig: &[u8],
    ) -> Result<()> {
        if key_rdata.len() <= dnskey_offset::PUBLIC_KEY {
            return Err(OracleError::SignatureFailed);
        }
        let flags = u16::from_be_bytes([key_rdata[0], key_rdata[1]]);
        let protocol = key_rdata[dnskey_offset::PROTOCOL];
        let key_alg = key_rdata[dnskey_offset::ALGORITHM];
        if protocol != 3 || key_alg != alg {
            return Err(OracleError::SignatureFailed);
        }
        if keytag::compute_keytag(key_rdata) != keytag_expected {
            return Err(OracleError::SignatureFailed);
        }
        if flags & DNSKEY_ZONE_KEY_FLAG == 0 {
            return Err(OracleError::SignatureFailed);
        }
        if !self.registry.verify_signature(alg, key_rdata, data, sig) {
            return Err(OracleError::SignatureFailed);
        }
        Ok(())
    }

    /// Finds a DS record in `ds_rrset` whose keytag, algorithm and digest
    /// all match the DNSKEY that just validated the signature.
    fn verify_key_with_ds(
        &self,
        keyname: &[u8],
        key_rdata: &[u8],
        keytag_expected: u16,
        alg: u8,
        ds_rrset: &[u8],
    ) -> Result<()> {
        let mut cursor = RrIter::new(ds_rrset, 0);
        while let Some((rr, next)) = cursor.next()? {
            cursor = next;
            if rr.dnstype != TYPE_DS {
                continue;
            }
            let ds_rdata = rr.rdata();
            if ds_rdata.len() <= ds_offset::DIGEST_TYPE {
                continue;
            }
            let ds_keytag = u16::from_be_bytes([ds_rdata[0], ds_rdata[1]]);
            let ds_alg = ds_rdata[ds_offset::ALGORITHM];
            if ds_keytag != keytag_expected || ds_alg != alg {
                continue;
            }
            let mut material = keyname.to_vec();
            material.extend_from_slice(key_rdata);
            let digest_type = ds_rdata[ds_offset::DIGEST_TYPE];
            if self.registry.verify_digest(digest_type, &material, &ds_rdata[ds_offset::DIGEST..]) {
                return Ok(());
            }
        }
        Err(OracleError::DSMismatch)
    }

    /// NSEC denial-of-existence check (RFC 4035 §5.4). `rr` is the NSEC RR;
    /// `nsec_name` is its owner name.
    fn check_nsec_name(&self, rr: &RrSlice, nsec_name: &[u8], delete_name: &[u8], delete_type: u16) -> Result<()> {
        let rdata = rr.rdata();
        let rdata_wire = Wire::new(rdata);
        let next_name_length = rdata_wire.name_length(0)?;
        if rdata_wire.len() <= next_name_length {
            return Err(OracleError::DenialProofFailed("NSEC rdata has no type bitmap after the next name"));
        }

        let cmp = Wire::compare_names(delete_name, nsec_name)?;
        if cmp == std::cmp::Ordering::Equal {
            if rdata_wire.check_type_bitmap(next_name_length, rdata_wire.len(), delete_type)? {
                return Err(OracleError::DenialProofFailed("delete_type is present at the NSEC owner name"));
            }
            return Ok(());
        }

        let next_name = rdata_wire.substring(0, next_name_length)?;
        if !name_interval_covers(nsec_name, next_name, delete_name)? {
            return Err(OracleError::DenialProofFailed("delete_name is not covered by the NSEC interval"));
        }
        Ok(())
    }

    /// NSEC3 denial-of-existence check (RFC 5155 §8). `rr` is the NSEC3 RR;
    /// `nsec_name` is its (base32hex-encoded-hash) owner name.
    fn check_nsec3_name(&self, rr: &RrSlice, nsec_name: &[u8], delete_name: &[u8], delete_type: u16) -> Result<()> {
        let rdata = rr.rdata();
        let w = Wire::new(rdata);
        let hash_alg = w.read_u8(0)?;
        let iterations = w.read_u16(2)?;
        let salt_length = w.read_u8(4)? as usize;
        let salt = w.substring(5, salt_length)?;

        let delete_hash = self
            .registry
            .nsec3_hash(hash_alg, salt, delete_name, iterations)
            .ok_or(OracleError::DenialProofFailed("no NSEC3 hash algorithm registered for this proof"))?;

        let next_len_offset = 5 + salt_length;
        let next_length = w.read_u8(next_len_offset)? as usize;
        if next_length > 32 {
            return Err(OracleError::DenialProofFailed("NSEC3 next hashed owner name exceeds 32 bytes"));
        }
        let next_hash = w.read_bytes_n(next_len_offset + 1, next_length)?;

        let nsec_label_len = *nsec_name
            .first()
            .ok_or(OracleError::MalformedWire { offset: 0, reason: "empty NSEC3 owner name" })?
            as usize;
        let nsec_hash = Wire::new(nsec_name).base32hex_decode_word(1, nsec_label_len)?;

        let bitmap_offset = next_len_offset + 1 + next_length;
        if delete_hash == nsec_hash {
            if w.check_type_bitmap(bitmap_offset, w.len(), delete_type)? {
                return Err(OracleError::DenialProofFailed("delete_type is present at the NSEC3 owner hash"));
            }
            return Ok(());
        }

        if !hash_interval_covers(nsec_hash, next_hash, delete_hash) {
            return Err(OracleError::DenialProofFailed("delete_name's hash is not covered by the NSEC3 interval"));
        }
        Ok(())
    }
}

/// Whether `delete_name` falls in the open interval `(nsec_name, next_name)`
/// in canonical order, per RFC 4035 §5.4 — including the wrap-around case
/// where `nsec_name` is the last name in the zone and `next_name` is the
/// apex, in which case the covered range is everything *after* `nsec_name`
/// **or** everything *before* `next_name`.
fn name_interval_covers(nsec_name: &[u8], next_name: &[u8], delete_name: &[u8]) -> crate::error::Result<bool> {
    use std::cmp::Ordering;
    let after_owner = Wire::compare_names(delete_name, nsec_name)? == Ordering::Greater;
    let before_next = Wire::compare_names(delete_name, next_name)? == Ordering::Less;
    Ok(if Wire::compare_names(nsec_name, next_name)? == Ordering::Less {
        after_owner && before_next
    } else {
        after_owner || before_next
    })
}

/// NSEC3 analogue of [`name_interval_covers`], over raw 32-byte hash words
/// (RFC 5155 §8.3) instead of canonical names.
fn hash_interval_covers(nsec_hash: [u8; 32], next_hash: [u8; 32], delete_hash: [u8; 32]) -> bool {
    if next_hash > nsec_hash {
        delete_hash > nsec_hash && delete_hash < next_hash
    } else {
        delete_hash > nsec_hash || delete_hash < next_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs1v15::SigningKey;
    use rsa::signature::{RandomizedSigner, SignatureEncoding};
    use rsa::traits::PublicKeyParts;
    use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
    use sha2::Sha256;

    const NOW: u64 = 1_700_000_000;

    fn name(labels: &[&[u8]]) -> Vec<u8> {
        let mut out = Vec::new();
        for l in labels {
            out.push(l.len() as u8);
            out.extend_from_slice(l);
        }
        out.push(0);
        out
    }

    fn rr(owner: &[u8], typ: u16, class: u16, ttl: u32, rdata: &[u8]) -> Vec<u8> {
        let mut out = owner.to_vec();
        out.extend_from_slice(&typ.to_be_bytes());
        out.extend_from_slice(&class.to_be_bytes());
        out.extend_from_slice(&ttl.to_be_bytes());
        out.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        out.extend_from_slice(rdata);
        out
    }

    fn rfc3110_encode(pub_key: &RsaPublicKey) -> Vec<u8> {
        let e = pub_key.e().to_bytes_be();
        let n = pub_key.n().to_bytes_be();
        let mut out = Vec::new();
        out.push(e.len() as u8);
        out.extend_from_slice(&e);
        out.extend_from_slice(&n);
        out
    }

    fn dnskey_rdata(pub_key: &RsaPublicKey) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&DNSKEY_ZONE_KEY_FLAG.to_be_bytes());
        out.push(3); // protocol
        out.push(crate::algo::RSASHA256);
        out.extend_from_slice(&rfc3110_encode(pub_key));
        out
    }

    fn rrsig_prefix_bytes(
        type_covered: u16,
        algorithm: u8,
        labels: u8,
        original_ttl: u32,
        expiration: u32,
        inception: u32,
        keytag: u16,
        signer_name: &[u8],
    ) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&type_covered.to_be_bytes());
        out.push(algorithm);
        out.push(labels);
        out.extend_from_slice(&original_ttl.to_be_bytes());
        out.extend_from_slice(&expiration.to_be_bytes());
        out.extend_from_slice(&inception.to_be_bytes());
        out.extend_from_slice(&keytag.to_be_bytes());
        out.extend_from_slice(signer_name);
        out
    }

    fn sign(priv_key: &RsaPrivateKey, data: &[u8]) -> Vec<u8> {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::<Sha256>::new(priv_key.clone());
        signing_key.sign_with_rng(&mut rng, data).to_vec()
    }

    /// Builds a root-zone trust chain: an RSA key pair, a DNSKEY RRSET for
    /// it, a DS anchor hashing it, and an Oracle bootstrapped with that DS
    /// as its only trust anchor.
    struct RootFixture {
        oracle: Oracle,
        priv_key: RsaPrivateKey,
        dnskey_rdata: Vec<u8>,
        keytag: u16,
    }

    /// DS rdata hashing `owner ++ dnskey_rdata` with SHA-256 (RFC 4034 §5.1.4).
    fn ds_rdata_for(owner: &[u8], dnskey_rdata: &[u8], keytag: u16) -> Vec<u8> {
        use sha2::Digest as _;
        let mut ds_rdata = Vec::new();
        ds_rdata.extend_from_slice(&keytag.to_be_bytes());
        ds_rdata.push(crate::algo::RSASHA256);
        ds_rdata.push(crate::digest::SHA256);
        let mut material = owner.to_vec();
        material.extend_from_slice(dnskey_rdata);
        ds_rdata.extend_from_slice(&Sha256::digest(&material));
        ds_rdata
    }

    impl RootFixture {
        /// The DS RRSET proof chaining this fixture's root DNSKEY, wrapped
        /// as a full RR the way `submit_rrset`'s `proof` argument expects.
        fn proof(&self) -> Vec<u8> {
            rr(ROOT_NAME, crate::types::TYPE_DS, CLASS_IN, 3600, &ds_rdata_from_oracle(self))
        }
    }

    /// The raw DS rdata hashing this fixture's DNSKEY.
    fn ds_rdata_from_oracle(fx: &RootFixture) -> Vec<u8> {
        ds_rdata_for(ROOT_NAME, &fx.dnskey_rdata, fx.keytag)
    }

    fn root_fixture() -> RootFixture {
        let mut rng = rand::thread_rng();
        let priv_key = RsaPrivateKey::new(&mut rng, 1024).unwrap();
        let pub_key = RsaPublicKey::from(&priv_key);
        let dnskey_rdata = dnskey_rdata(&pub_key);
        let keytag = keytag::compute_keytag(&dnskey_rdata);

        let ds_rdata = ds_rdata_for(ROOT_NAME, &dnskey_rdata, keytag);
        let anchors = rr(ROOT_NAME, crate::types::TYPE_DS, CLASS_IN, 3600, &ds_rdata);
        let oracle = Oracle::new(&anchors, NOW, "admin");

        RootFixture { oracle, priv_key, dnskey_rdata, keytag }
    }

    /// Submits the root DNSKEY RRSET (self-signed, chained through the DS
    /// anchor) and returns the (input, sig, proof, rrs) tuple used to do so.
    fn submit_root_dnskey(fx: &mut RootFixture, inception: u32, expiration: u32) -> Result<Option<OracleEvent>> {
        let rrs = rr(ROOT_NAME, TYPE_DNSKEY, CLASS_IN, 3600, &fx.dnskey_rdata);
        let prefix =
            rrsig_prefix_bytes(TYPE_DNSKEY, crate::algo::RSASHA256, 0, 3600, expiration, inception, fx.keytag, ROOT_NAME);
        let mut input = prefix.clone();
        input.extend_from_slice(&rrs);
        let sig = sign(&fx.priv_key, &input);
        let proof = fx.proof();

        fx.oracle.submit_rrset(NOW, &input, &sig, &proof)
    }

    #[test]
    fn anchor_bootstrap_is_readable() {
        let fx = root_fixture();
        let (inception, inserted, fp) = fx.oracle.rrdata(crate::types::TYPE_DS, crate::store::ANCHOR_NAME);
        assert_eq!(inception, 0);
        assert_eq!(inserted, NOW);
        assert_eq!(fp, crate::store::fingerprint(fx.oracle.anchors()));
    }

    #[test]
    fn accepts_self_signed_root_dnskey_chained_through_ds() {
        let mut fx = root_fixture();
        let inception = (NOW as u32).saturating_sub(1000);
        let expiration = (NOW as u32) + 1_000_000;

        let event = submit_root_dnskey(&mut fx, inception, expiration).unwrap();
        assert!(matches!(event, Some(OracleEvent::RRSetUpdated { .. })));

        let (got_inception, inserted, _fp) = fx.oracle.rrdata(TYPE_DNSKEY, ROOT_NAME);
        assert_eq!(got_inception, inception);
        assert_eq!(inserted, NOW);
    }

    #[test]
    fn replay_with_older_inception_is_rejected() {
        let mut fx = root_fixture();
        let first_inception = (NOW as u32).saturating_sub(1000);
        let expiration = (NOW as u32) + 1_000_000;
        submit_root_dnskey(&mut fx, first_inception, expiration).unwrap();

        let older_inception = first_inception - 500;
        let err = submit_root_dnskey(&mut fx, older_inception, expiration).unwrap_err();
        assert!(matches!(err, OracleError::ReplayRejected { .. }));

        // store is unchanged
        let (got_inception, _, _) = fx.oracle.rrdata(TYPE_DNSKEY, ROOT_NAME);
        assert_eq!(got_inception, first_inception);
    }

    #[test]
    fn identical_resubmit_is_idempotent_noop() {
        let mut fx = root_fixture();
        let inception = (NOW as u32).saturating_sub(1000);
        let expiration = (NOW as u32) + 1_000_000;
        let first = submit_root_dnskey(&mut fx, inception, expiration).unwrap();
        assert!(first.is_some());

        let (_, inserted_before, _) = fx.oracle.rrdata(TYPE_DNSKEY, ROOT_NAME);

        // Re-submitting bitwise-identical input/sig/proof must be a no-op:
        // same inception, so the RRSIG signature and fingerprint are
        // identical to what's already stored.
        let second = submit_root_dnskey(&mut fx, inception, expiration).unwrap();
        assert!(second.is_none());

        let (_, inserted_after, _) = fx.oracle.rrdata(TYPE_DNSKEY, ROOT_NAME);
        assert_eq!(inserted_before, inserted_after);
    }

    #[test]
    fn expired_signature_is_rejected() {
        let mut fx = root_fixture();
        let inception = (NOW as u32).saturating_sub(10_000);
        let expiration = (NOW as u32).saturating_sub(1_000); // already expired
        let err = submit_root_dnskey(&mut fx, inception, expiration).unwrap_err();
        assert!(matches!(err, OracleError::TimeWindow { .. }));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let mut fx = root_fixture();
        let inception = (NOW as u32).saturating_sub(1000);
        let expiration = (NOW as u32) + 1_000_000;

        let rrs = rr(ROOT_NAME, TYPE_DNSKEY, CLASS_IN, 3600, &fx.dnskey_rdata);
        let prefix =
            rrsig_prefix_bytes(TYPE_DNSKEY, crate::algo::RSASHA256, 0, 3600, expiration, inception, fx.keytag, ROOT_NAME);
        let mut input = prefix;
        input.extend_from_slice(&rrs);
        let mut sig = sign(&fx.priv_key, &input);
        sig[0] ^= 0xFF;

        let proof = rr(ROOT_NAME, crate::types::TYPE_DS, CLASS_IN, 3600, &ds_rdata_from_oracle(&fx));
        let err = fx.oracle.submit_rrset(NOW, &input, &sig, &proof).unwrap_err();
        assert!(matches!(err, OracleError::SignatureFailed));
    }

    #[test]
    fn admin_setter_rejects_wrong_caller() {
        let mut fx = root_fixture();
        let err = fx
            .oracle
            .set_algorithm("not-admin", crate::algo::RSASHA256, Box::new(crate::algo::RsaSha256::new()))
            .unwrap_err();
        assert!(matches!(err, OracleError::Unauthorized));
    }

    #[test]
    fn admin_setter_accepts_correct_caller() {
        let mut fx = root_fixture();
        let event = fx
            .oracle
            .set_algorithm("admin", crate::algo::RSASHA256, Box::new(crate::algo::RsaSha256::new()))
            .unwrap();
        assert!(matches!(event, OracleEvent::AlgorithmUpdated { .. }));
    }

    fn example_name() -> Vec<u8> {
        name(&[b"example"])
    }

    fn foo_example_name() -> Vec<u8> {
        name(&[b"foo", b"example"])
    }

    fn zzz_example_name() -> Vec<u8> {
        name(&[b"zzz", b"example"])
    }

    fn zzzzz_example_name() -> Vec<u8> {
        name(&[b"zzzzz", b"example"])
    }

    /// A minimal NSEC rdata: next owner name + an empty type bitmap window
    /// that does not contain `type_to_check`.
    fn nsec_rdata_without(next_name: &[u8], type_to_check: u16) -> Vec<u8> {
        let mut out = next_name.to_vec();
        let window = (type_to_check >> 8) as u8;
        out.push(window);
        out.push(1); // bitmap length
        out.push(0); // no bits set
        out
    }

    #[test]
    fn nsec_deletion_of_covered_name_succeeds() {
        let mut fx = root_fixture();
        let inception = (NOW as u32).saturating_sub(1000);
        let expiration = (NOW as u32) + 1_000_000;

        // Establish root's own DNSKEY as a stored trust entry so it can serve
        // as the proof for the NSEC below (also signed by root).
        submit_root_dnskey(&mut fx, inception, expiration).unwrap();

        // First, put a stale A record in the store "by hand" so there's
        // something to delete (as if an earlier submit_rrset had put it there).
        let a_name = foo_example_name();
        fx.oracle.store.put(
            hash_name(&a_name),
            1, // A
            RRSet { inception, inserted: NOW, fingerprint: [1u8; 20] },
        );

        // NSEC at "example", next name "zzz.example", no A bit set.
        let nsec_rdata = nsec_rdata_without(&zzz_example_name(), 1);
        let nsec_rrs = rr(&example_name(), TYPE_NSEC, CLASS_IN, 3600, &nsec_rdata);
        let nsec_prefix = rrsig_prefix_bytes(
            TYPE_NSEC,
            crate::algo::RSASHA256,
            1,
            3600,
            expiration,
            inception,
            fx.keytag,
            ROOT_NAME,
        );
        let mut nsec_input = nsec_prefix;
        nsec_input.extend_from_slice(&nsec_rrs);
        let sig = sign(&fx.priv_key, &nsec_input);
        let proof = rr(ROOT_NAME, TYPE_DNSKEY, CLASS_IN, 3600, &fx.dnskey_rdata);

        fx.oracle.delete_rrset(NOW, 1, &a_name, &nsec_input, &sig, &proof).unwrap();

        let (_, inserted, _) = fx.oracle.rrdata(1, &a_name);
        assert_eq!(inserted, 0);
    }

    fn al_name() -> Vec<u8> {
        name(&[b"al"])
    }

    #[test]
    fn name_interval_wraparound_covers_both_sides_of_the_apex() {
        // Last NSEC in the zone wraps: owner "zzz.example", next name
        // "example" (fewer labels, sorts first — the zone apex).
        let owner = zzz_example_name();
        let next = example_name();

        // "al" sorts before the apex, so it's covered by the wrap.
        assert!(name_interval_covers(&owner, &next, &al_name()).unwrap());
        // "zzzzz.example" sorts after the owner, also covered by the wrap.
        assert!(name_interval_covers(&owner, &next, &zzzzz_example_name()).unwrap());
        // "foo.example" sits strictly between next and owner — not covered.
        assert!(!name_interval_covers(&owner, &next, &foo_example_name()).unwrap());
        // The owner and next names themselves are boundary points, not covered.
        assert!(!name_interval_covers(&owner, &next, &owner).unwrap());
        assert!(!name_interval_covers(&owner, &next, &next).unwrap());
    }

    #[test]
    fn name_interval_non_wraparound_is_a_plain_open_range() {
        let owner = example_name();
        let next = zzz_example_name();
        assert!(name_interval_covers(&owner, &next, &foo_example_name()).unwrap());
        assert!(!name_interval_covers(&owner, &next, &al_name()).unwrap());
    }

    #[test]
    fn hash_interval_wraparound_covers_both_sides_of_the_ring_start() {
        let owner_hash = [250u8; 32];
        let next_hash = [10u8; 32];
        assert!(hash_interval_covers(owner_hash, next_hash, [5u8; 32]));
        assert!(hash_interval_covers(owner_hash, next_hash, [255u8; 32]));
        assert!(!hash_interval_covers(owner_hash, next_hash, [100u8; 32]));
    }

    #[test]
    fn hash_interval_non_wraparound_is_a_plain_open_range() {
        let owner_hash = [10u8; 32];
        let next_hash = [250u8; 32];
        assert!(hash_interval_covers(owner_hash, next_hash, [100u8; 32]));
        assert!(!hash_interval_covers(owner_hash, next_hash, [5u8; 32]));
    }

    #[test]
    fn signer_name_must_be_label_aligned_ancestor() {
        // "ab\x03com" as a single label is NOT an ancestor of "com.", even
        // though its raw wire-byte tail happens to equal "com."'s bytes.
        let mut forged = vec![6u8];
        forged.extend_from_slice(b"ab");
        forged.extend_from_slice(&[3, b'c', b'o', b'm']);
        forged.push(0);
        let com = name(&[b"com"]);
        assert!(!is_label_aligned_suffix(&forged, &com));

        let sub = name(&[b"www", b"example", b"com"]);
        let parent = name(&[b"example", b"com"]);
        assert!(is_label_aligned_suffix(&sub, &parent));
        assert!(is_label_aligned_suffix(&sub, &sub));
    }
}
