//! # Domain Layer
//!
//! Pure protocol logic: records, batch formation and rotation arithmetic.
//! Nothing in here touches storage or verifies signatures.

pub mod admin;
pub mod config;
pub mod error;
pub mod node;
pub mod randomizer;
pub mod rotation;

pub use admin::{AdminConfig, SetupRequest};
pub use config::{ConfigError, RotationConfig};
pub use error::{KVStoreError, RotationError, RotationResult};
pub use node::{check_epoch, NodeRecord, RegistrationInfo, RegistrationRequest};
pub use randomizer::{
    randomize_batch, shuffle, split_into_batches, BatchPartition, KeccakShuffleSource,
    ShuffleSource,
};
pub use rotation::{ActiveBatch, DutyReport, PendingBatch, VerifierBatchSet};
