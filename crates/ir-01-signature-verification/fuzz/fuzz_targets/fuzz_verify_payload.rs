//! Fuzz target for payload signature verification.
//!
//! Registration payloads, keys and signatures all arrive as untrusted
//! command arguments, so verification must stay total on arbitrary bytes.
//!
//! ## Running
//!
//! ```bash
//! cd crates/ir-01-signature-verification
//! cargo +nightly fuzz run fuzz_verify_payload
//! ```

#![no_main]

use ir_01_signature_verification::{verify_payload_detailed, EcdsaVerifier, SignatureVerificationApi};
use libfuzzer_sys::fuzz_target;

/// Fuzz input structure for payload verification.
#[derive(Debug, arbitrary::Arbitrary)]
struct FuzzInput {
    /// Signed payload bytes
    payload: Vec<u8>,
    /// Public key in any length
    public_key: Vec<u8>,
    /// Signature in any length
    signature: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let verifier = EcdsaVerifier::new();

    // Verify - this should NEVER panic, regardless of input
    let result = verify_payload_detailed(&input.payload, &input.public_key, &input.signature);

    // Result should be deterministic and agree with the trait entry point
    let again = verifier.verify_payload(&input.payload, &input.public_key, &input.signature);
    assert_eq!(result.valid, again);

    // Should not have both valid=true and error=Some
    if result.valid {
        assert!(result.error.is_none());
    } else {
        assert!(result.error.is_some());
    }
});
