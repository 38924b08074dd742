//! The externally observable effects of a successful oracle call, besides
//! the store mutation itself (§6.5). The host embeds the oracle and decides
//! what to do with these — forward them to an indexer, log them, drop
//! them — the core only ever constructs and returns them.

/// Emitted exactly once per successful state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleEvent {
    /// A `submit_rrset` call committed a new or changed fingerprint.
    RRSetUpdated { name: Vec<u8>, rrs: Vec<u8> },
    AlgorithmUpdated { id: u8, identity: String },
    DigestUpdated { id: u8, identity: String },
    Nsec3DigestUpdated { id: u8, identity: String },
}
