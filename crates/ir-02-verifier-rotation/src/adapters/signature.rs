//! Adapter implementing the rotation `SignatureVerifier` port.
//! Delegates to ir-01 stateless payload verification.

use crate::ports::SignatureVerifier;
use ir_01_signature_verification::verify_payload_detailed;
use tracing::debug;

/// secp256k1 ECDSA over SHA-256 of the payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdsaSignatureAdapter;

impl EcdsaSignatureAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl SignatureVerifier for EcdsaSignatureAdapter {
    fn verify(&self, payload: &[u8], public_key: &[u8], signature: &[u8]) -> bool {
        let result = verify_payload_detailed(payload, public_key, signature);
        if let Some(error) = &result.error {
            debug!(%error, "payload signature rejected");
        }
        result.valid
    }
}
