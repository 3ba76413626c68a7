//! Error types for the rotation subsystem

use shared_types::{Address, BlockHeight};
use thiserror::Error;

/// Result alias used throughout the service.
pub type RotationResult<T> = Result<T, RotationError>;

/// Protocol rejections and storage failures.
///
/// Every variant except [`RotationError::Storage`] is a protocol-level
/// rejection: the call had no effect on stored state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RotationError {
    #[error("Signature does not verify under the supplied public key")]
    SignatureInvalid,

    #[error("Admin configuration has not been set up")]
    NotYetConfigured,

    #[error("Admin configuration is already set up")]
    AlreadyConfigured,

    #[error("Admin key is not the trusted admin key")]
    UntrustedAdmin,

    #[error("Eligible address list is empty")]
    EmptyAddressList,

    #[error("Malformed eligible address list: {0}")]
    MalformedAddressList(String),

    #[error("Address {0} is not eligible")]
    NotEligible(Address),

    #[error("Malformed registration payload: {0}")]
    MalformedPayload(String),

    #[error(
        "Registration height {submitted} rejected: current height {current}, last registered {last:?}"
    )]
    EpochViolation {
        submitted: BlockHeight,
        current: BlockHeight,
        last: Option<BlockHeight>,
    },

    #[error("Address {0} does not belong to the supplied public key")]
    IdentityMismatch(Address),

    #[error("Batch count must be at least 1")]
    InvalidBatchCount,

    #[error("No active verifier batch")]
    NoActiveBatch,

    #[error("Caller identity is missing")]
    MissingCallerIdentity,

    #[error("Storage error: {0}")]
    Storage(#[from] KVStoreError),
}

/// Key-value store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// Stored bytes could not be decoded.
    #[error("KV store corruption at {key}: {message}")]
    CorruptionError { key: String, message: String },
}
