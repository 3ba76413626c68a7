//! # Domain Entities
//!
//! Wire encodings of keys and signatures accepted by the verifier.
//!
//! Nodes sign with the raw 64-byte `x || y` public key form and append a
//! recovery byte to their signatures; SEC1 encodings and compact signatures
//! are accepted as well.

use super::errors::SignatureError;
use k256::ecdsa::VerifyingKey;

/// SHA-256 digest of a signed payload.
pub type Digest = [u8; 32];

/// `x || y` without the SEC1 tag byte.
pub const RAW_PUBLIC_KEY_LEN: usize = 64;
/// SEC1 uncompressed: `0x04 || x || y`.
pub const UNCOMPRESSED_PUBLIC_KEY_LEN: usize = 65;
/// SEC1 compressed: `0x02/0x03 || x`.
pub const COMPRESSED_PUBLIC_KEY_LEN: usize = 33;

/// `r || s`.
pub const COMPACT_SIGNATURE_LEN: usize = 64;
/// `r || s || v`.
pub const RECOVERABLE_SIGNATURE_LEN: usize = 65;

const SEC1_UNCOMPRESSED_TAG: u8 = 0x04;

// =============================================================================
// ECDSA Types (secp256k1)
// =============================================================================

/// ECDSA signature on the secp256k1 curve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcdsaSignature {
    /// R component (32 bytes)
    pub r: [u8; 32],
    /// S component (32 bytes)
    pub s: [u8; 32],
    /// Recovery byte, present when the signer sent the 65-byte form.
    /// Not used for verification.
    pub v: Option<u8>,
}

impl EcdsaSignature {
    /// Parse a 64-byte compact or 65-byte recoverable signature.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignatureError> {
        let v = match bytes.len() {
            COMPACT_SIGNATURE_LEN => None,
            RECOVERABLE_SIGNATURE_LEN => Some(bytes[COMPACT_SIGNATURE_LEN]),
            _ => return Err(SignatureError::InvalidFormat),
        };

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..COMPACT_SIGNATURE_LEN]);

        Ok(Self { r, s, v })
    }

    /// `r || s` bytes.
    pub fn to_compact(&self) -> [u8; COMPACT_SIGNATURE_LEN] {
        let mut bytes = [0u8; COMPACT_SIGNATURE_LEN];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..].copy_from_slice(&self.s);
        bytes
    }
}

/// Validated secp256k1 public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcdsaPublicKey {
    key: VerifyingKey,
}

impl EcdsaPublicKey {
    /// Parse a raw, SEC1 uncompressed or SEC1 compressed public key.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SignatureError> {
        let parsed = match bytes.len() {
            RAW_PUBLIC_KEY_LEN => {
                let mut sec1 = [0u8; UNCOMPRESSED_PUBLIC_KEY_LEN];
                sec1[0] = SEC1_UNCOMPRESSED_TAG;
                sec1[1..].copy_from_slice(bytes);
                VerifyingKey::from_sec1_bytes(&sec1)
            }
            UNCOMPRESSED_PUBLIC_KEY_LEN | COMPRESSED_PUBLIC_KEY_LEN => {
                VerifyingKey::from_sec1_bytes(bytes)
            }
            _ => return Err(SignatureError::InvalidPublicKey),
        };

        parsed
            .map(|key| Self { key })
            .map_err(|_| SignatureError::InvalidPublicKey)
    }

    /// Wrap an existing verifying key.
    pub fn from_verifying_key(key: VerifyingKey) -> Self {
        Self { key }
    }

    /// Underlying k256 key.
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.key
    }

    /// Raw `x || y` form, as used by node configuration files.
    pub fn to_raw_bytes(&self) -> [u8; RAW_PUBLIC_KEY_LEN] {
        let encoded = self.key.to_encoded_point(false);
        let mut raw = [0u8; RAW_PUBLIC_KEY_LEN];
        raw.copy_from_slice(&encoded.as_bytes()[1..]);
        raw
    }
}

// =============================================================================
// Verification Result
// =============================================================================

/// Result of a payload verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationResult {
    /// Whether the signature is valid
    pub valid: bool,
    /// Error details (if verification failed)
    pub error: Option<SignatureError>,
}

impl VerificationResult {
    /// Create a successful verification result.
    pub fn valid() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    /// Create a failed verification result.
    pub fn invalid(error: SignatureError) -> Self {
        Self {
            valid: false,
            error: Some(error),
        }
    }
}
