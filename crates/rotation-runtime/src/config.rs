//! Runtime configuration.
//!
//! Built from defaults, then environment variables, then CLI flags; later
//! sources win.

use ir_02_verifier_rotation::{ConfigError, RotationConfig};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_STATE_FILE: &str = "rotation-state.json";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable names.
pub mod env_keys {
    pub const STATE_FILE: &str = "ROTATION_STATE_FILE";
    pub const LOG_LEVEL: &str = "ROTATION_LOG_LEVEL";
    pub const TARGET_BATCHES: &str = "ROTATION_TARGET_BATCHES";
    pub const FRESHNESS_WINDOW: &str = "ROTATION_FRESHNESS_WINDOW";
    pub const TRUSTED_ADMIN_KEY: &str = "ROTATION_TRUSTED_ADMIN_KEY";
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuntimeConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Rotation(#[from] ConfigError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Where protocol state is persisted between invocations
    pub state_file: PathBuf,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    pub rotation: RotationConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            rotation: RotationConfig::default(),
        }
    }
}

/// Values given on the command line.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub state_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub target_batch_count: Option<usize>,
    pub freshness_window: Option<u64>,
    /// Hex-encoded public key
    pub trusted_admin_key: Option<String>,
}

impl RuntimeConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, RuntimeConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RuntimeConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(env_keys::STATE_FILE) {
            config.state_file = PathBuf::from(path);
        }
        if let Some(level) = lookup(env_keys::LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(value) = lookup(env_keys::TARGET_BATCHES) {
            config.rotation.target_batch_count = parse_number(env_keys::TARGET_BATCHES, &value)?;
        }
        if let Some(value) = lookup(env_keys::FRESHNESS_WINDOW) {
            config.rotation.freshness_window = parse_number(env_keys::FRESHNESS_WINDOW, &value)?;
        }
        if let Some(value) = lookup(env_keys::TRUSTED_ADMIN_KEY) {
            config.rotation.trusted_admin_key =
                Some(parse_hex(env_keys::TRUSTED_ADMIN_KEY, &value)?);
        }

        Ok(config)
    }

    /// Apply CLI values on top.
    pub fn apply(&mut self, overrides: ConfigOverrides) -> Result<(), RuntimeConfigError> {
        if let Some(path) = overrides.state_file {
            self.state_file = path;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        if let Some(count) = overrides.target_batch_count {
            self.rotation.target_batch_count = count;
        }
        if let Some(window) = overrides.freshness_window {
            self.rotation.freshness_window = window;
        }
        if let Some(key) = overrides.trusted_admin_key {
            self.rotation.trusted_admin_key = Some(parse_hex("--trusted-admin-key", &key)?);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), RuntimeConfigError> {
        self.rotation.validate()?;
        Ok(())
    }
}

fn parse_number<T>(key: &str, value: &str) -> Result<T, RuntimeConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| RuntimeConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn parse_hex(key: &str, value: &str) -> Result<Vec<u8>, RuntimeConfigError> {
    hex::decode(value.trim().trim_start_matches("0x")).map_err(|e| {
        RuntimeConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        }
    })
}
