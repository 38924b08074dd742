use thiserror::Error;

/// Error taxonomy for the validation engine. Every public entry point in
/// [`crate::Oracle`] returns one of these on failure; no variant is retried
/// internally, and a returned error always means the store is unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OracleError {
    #[error("malformed wire data at offset {offset}: {reason}")]
    MalformedWire { offset: usize, reason: &'static str },

    #[error("unsupported class {0} (only IN=1 is accepted)")]
    UnsupportedClass(u16),

    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: u16, actual: u16 },

    #[error("name mismatch: {0}")]
    NameMismatch(&'static str),

    #[error("replay rejected: inception {incoming} is older than stored inception {stored}")]
    ReplayRejected { incoming: u32, stored: u32 },

    #[error("no trust anchor/key found for the proof's owner name and type")]
    NoTrust,

    #[error("signature verification failed: no candidate key validated the signature")]
    SignatureFailed,

    #[error("no DS record matched the key's tag, algorithm and digest")]
    DSMismatch,

    #[error("time window violated: inception={inception} expiration={expiration} now={now}")]
    TimeWindow {
        inception: u32,
        expiration: u32,
        now: u32,
    },

    #[error("proof record is neither DNSKEY nor DS (type {0})")]
    UnsupportedProofType(u16),

    #[error("delete proof record is neither NSEC nor NSEC3 (type {0})")]
    UnrecognizedRecordType(u16),

    #[error("NSEC/NSEC3 denial-of-existence proof failed: {0}")]
    DenialProofFailed(&'static str),

    #[error("admin operation not authorized")]
    Unauthorized,

    #[error("resource bound exceeded: {0}")]
    ResourceExceeded(&'static str),
}

pub type Result<T> = std::result::Result<T, OracleError>;
