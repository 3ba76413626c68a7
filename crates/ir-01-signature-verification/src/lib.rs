//! # Signature Verification Subsystem (IR-01)
//!
//! Verifies that a payload was signed by the private key matching a given
//! public key. Used by the rotation core to authorize the admin bootstrap and
//! every node registration.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): pure cryptographic logic, no I/O
//! - **Ports Layer** (`ports/`): the inbound verification API
//!
//! ## Scheme
//!
//! ECDSA over secp256k1 on the SHA-256 digest of the payload bytes.
//!
//! ## Security Notes
//!
//! - **Malleability Prevention**: signatures with high S values are rejected
//! - **Total**: malformed keys or signatures yield `false`, never a panic

pub mod domain;
pub mod ports;

// Re-export public API
pub use domain::ecdsa::{payload_digest, verify_payload, verify_payload_detailed, EcdsaVerifier};
pub use domain::entities::{Digest, EcdsaPublicKey, EcdsaSignature, VerificationResult};
pub use domain::errors::SignatureError;
pub use ports::inbound::SignatureVerificationApi;
