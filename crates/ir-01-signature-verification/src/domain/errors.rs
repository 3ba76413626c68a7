//! # Signature Errors
//!
//! Error types for payload signature verification.

use thiserror::Error;

/// Reasons a payload signature is rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The signature has the wrong length or an out-of-range scalar
    #[error("Invalid signature format")]
    InvalidFormat,

    /// The public key has the wrong length or is not a curve point
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Signature has high S value
    #[error("Malleable signature (high S value)")]
    MalleableSignature,

    /// Signature doesn't match payload/key
    #[error("Signature verification failed")]
    VerificationFailed,
}
