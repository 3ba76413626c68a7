//! # Rotation Runtime
//!
//! Host process for the verifier rotation protocol.
//!
//! - `config`: defaults, environment and CLI overrides
//! - `store`: file-backed key-value store (JSON snapshot)
//! - `runner`: wires store, ECDSA verifier and command handler for one call

pub mod config;
pub mod runner;
pub mod store;

pub use config::{ConfigOverrides, RuntimeConfig, RuntimeConfigError};
pub use runner::{run, Invocation, RunError};
pub use store::FileBackedKVStore;
