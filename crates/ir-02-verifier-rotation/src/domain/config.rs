//! Rotation configuration

use ir_01_signature_verification::EcdsaPublicKey;
use thiserror::Error;

/// Default number of verify-target sub-batches per rotation.
pub const DEFAULT_TARGET_BATCH_COUNT: usize = 4;

/// Default freshness window: a node counts as live at its registration
/// height and the one right after it.
pub const DEFAULT_FRESHNESS_WINDOW: u64 = 1;

/// Configuration for the rotation service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RotationConfig {
    /// Sub-batches produced by `set_next_verify_targets_batch`
    pub target_batch_count: usize,
    /// Heights after the last registration during which a node is live
    pub freshness_window: u64,
    /// If set, `setup` only accepts this admin public key
    pub trusted_admin_key: Option<Vec<u8>>,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            target_batch_count: DEFAULT_TARGET_BATCH_COUNT,
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
            trusted_admin_key: None,
        }
    }
}

impl RotationConfig {
    /// Pin the admin key accepted by `setup`.
    pub fn with_trusted_admin_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.trusted_admin_key = Some(key.into());
        self
    }

    /// Reject configurations the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_batch_count == 0 {
            return Err(ConfigError::ZeroTargetBatchCount);
        }
        if let Some(key) = &self.trusted_admin_key {
            EcdsaPublicKey::from_slice(key).map_err(|_| ConfigError::InvalidTrustedAdminKey)?;
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("target batch count must be at least 1")]
    ZeroTargetBatchCount,

    #[error("trusted admin key is not a valid secp256k1 public key")]
    InvalidTrustedAdminKey,
}
