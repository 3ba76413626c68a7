//! Driven ports (Outbound dependencies)

use crate::domain::{KVStoreError, ShuffleSource};
use shared_types::{Address, BlockHeight};

/// Abstract interface for key-value storage of protocol records.
///
/// Values are JSON documents keyed by record kind and address.
///
/// Production: `FileBackedKVStore` (rotation-runtime)
/// Testing: `InMemoryKVStore`
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &str) -> Result<Option<String>, KVStoreError>;

    /// Put a single key-value pair.
    fn put(&mut self, key: &str, value: &str) -> Result<(), KVStoreError>;

    /// Delete a key.
    fn delete(&mut self, key: &str) -> Result<(), KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Either ALL operations in the batch succeed, or NONE are applied.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> Result<bool, KVStoreError>;
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put { key: String, value: String },
    /// Delete a key.
    Delete { key: String },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(key: impl Into<String>, value: impl Into<String>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    pub fn delete(key: impl Into<String>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }

    pub fn key(&self) -> &str {
        match self {
            BatchOperation::Put { key, .. } | BatchOperation::Delete { key } => key,
        }
    }
}

/// Payload signature verification.
///
/// Must return `false` (never panic) on malformed keys or signatures.
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, payload: &[u8], public_key: &[u8], signature: &[u8]) -> bool;
}

/// Address ownership.
///
/// An address is derived from a public key; only that key may register it.
pub trait AddressVerifier: Send + Sync {
    /// True iff `address` is derived from `public_key`. False on malformed keys.
    fn owns(&self, address: &Address, public_key: &[u8]) -> bool;
}

/// Factory for shuffle sources.
///
/// `height` is `Some` for rotation scheduling and `None` for the direct
/// randomize command.
pub trait RandomnessProvider: Send + Sync {
    fn source(&self, seed: i64, height: Option<BlockHeight>) -> Box<dyn ShuffleSource>;
}
