//! # ECDSA Verification (secp256k1)
//!
//! Pure domain logic for payload signature verification.
//!
//! ## Security Notes
//!
//! - **Malleability Prevention**: S must be STRICTLY LESS THAN SECP256K1_HALF_ORDER
//! - **Scalar Range Validation**: R and S must be in [1, n-1] (enforced by k256)
//! - **Constant-Time Operations**: Uses `subtle` crate for the S range check
//! - The payload is hashed with SHA-256 and verified as a prehash, matching
//!   what node clients sign

use super::entities::{Digest, EcdsaPublicKey, EcdsaSignature, VerificationResult};
use super::errors::SignatureError;
use crate::ports::inbound::SignatureVerificationApi;
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::Signature;
use sha2::{Digest as _, Sha256};
use subtle::Choice;
use tracing::trace;

/// Half of the secp256k1 curve order (for malleability check).
/// n/2 where n = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

// =============================================================================
// ECDSA VERIFIER
// =============================================================================

/// Payload signature verifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdsaVerifier;

impl EcdsaVerifier {
    /// Create a new ECDSA verifier.
    pub fn new() -> Self {
        Self
    }
}

impl SignatureVerificationApi for EcdsaVerifier {
    fn verify_payload(&self, payload: &[u8], public_key: &[u8], signature: &[u8]) -> bool {
        verify_payload(payload, public_key, signature)
    }

    fn verify_payload_detailed(
        &self,
        payload: &[u8],
        public_key: &[u8],
        signature: &[u8],
    ) -> VerificationResult {
        verify_payload_detailed(payload, public_key, signature)
    }
}

// =============================================================================
// CORE VERIFICATION FUNCTIONS
// =============================================================================

/// SHA-256 digest of the payload; this is the value that gets signed.
pub fn payload_digest(payload: &[u8]) -> Digest {
    Sha256::digest(payload).into()
}

/// Verify `signature` over `payload` against `public_key`.
///
/// Returns `false` for any malformed input.
pub fn verify_payload(payload: &[u8], public_key: &[u8], signature: &[u8]) -> bool {
    verify_payload_detailed(payload, public_key, signature).valid
}

/// Verify `signature` over `payload`, reporting why it failed.
///
/// Checks, in order:
/// 1. Signature length (64 or 65 bytes)
/// 2. S is in lower half of the curve order
/// 3. Public key encoding and curve membership
/// 4. R and S are in [1, n-1]
/// 5. The ECDSA equation over the SHA-256 digest
pub fn verify_payload_detailed(
    payload: &[u8],
    public_key: &[u8],
    signature: &[u8],
) -> VerificationResult {
    let signature = match EcdsaSignature::from_slice(signature) {
        Ok(signature) => signature,
        Err(e) => return VerificationResult::invalid(e),
    };

    if !is_low_s(&signature.s) {
        return VerificationResult::invalid(SignatureError::MalleableSignature);
    }

    let public_key = match EcdsaPublicKey::from_slice(public_key) {
        Ok(key) => key,
        Err(e) => return VerificationResult::invalid(e),
    };

    let sig = match Signature::from_slice(&signature.to_compact()) {
        Ok(sig) => sig,
        Err(_) => return VerificationResult::invalid(SignatureError::InvalidFormat),
    };

    let digest = payload_digest(payload);
    match public_key.verifying_key().verify_prehash(&digest, &sig) {
        Ok(()) => VerificationResult::valid(),
        Err(_) => {
            trace!(payload_len = payload.len(), "ECDSA equation does not hold");
            VerificationResult::invalid(SignatureError::VerificationFailed)
        }
    }
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Check if S value is in lower half of curve order.
///
/// S must be STRICTLY LESS THAN half_order (not equal).
///
/// Runs in fixed time regardless of input values.
fn is_low_s(s: &[u8; 32]) -> bool {
    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for (s_byte, h_byte) in s.iter().zip(SECP256K1_HALF_ORDER.iter()) {
        // less = less OR (NOT decided AND s[i] < h[i])
        // greater = greater OR (NOT decided AND s[i] > h[i])
        let not_decided = !(less | greater);
        let byte_less = Choice::from((s_byte < h_byte) as u8);
        let byte_greater = Choice::from((s_byte > h_byte) as u8);

        less |= not_decided & byte_less;
        greater |= not_decided & byte_greater;
    }

    less.into()
}
