//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of this subsystem.

use crate::domain::entities::VerificationResult;

/// Payload signature verification API.
///
/// Implementations must be thread-safe (`Send + Sync`) and total: malformed
/// keys or signatures are reported as invalid, never as a panic.
pub trait SignatureVerificationApi: Send + Sync {
    /// True iff `signature` over `payload` was produced by the private key
    /// matching `public_key`.
    fn verify_payload(&self, payload: &[u8], public_key: &[u8], signature: &[u8]) -> bool;

    /// Same check, with the failure reason.
    fn verify_payload_detailed(
        &self,
        payload: &[u8],
        public_key: &[u8],
        signature: &[u8],
    ) -> VerificationResult;
}
