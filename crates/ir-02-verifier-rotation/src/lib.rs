//! # Verifier Rotation Subsystem (IR-02)
//!
//! Decides, height by height, which member of a registered pool of IoT nodes
//! acts as verifier and which nodes it has to attest.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): records, epoch gate, randomizer, rotation
//! - **Ports Layer** (`ports/`): `VerifierRotationApi` in; storage, signature
//!   verification, address ownership and randomness out
//! - **Adapters** (`adapters/`): ECDSA bridge to IR-01, key-hash addresses,
//!   Keccak randomness, in-memory store
//! - **Service** (`service/`): the protocol state machine
//! - **IPC** (`ipc/`): method-name/JSON-argument command interface
//!
//! ## Protocol
//!
//! ```text
//! setup ──> register (each height) ──> setNextVerifyTargetsBatch
//!                                             │ height advances
//!                                             ▼
//!                        getNextVerifierBatch / dapp_schedule
//! ```
//!
//! 1. The admin signs the eligible address list once (`setup`)
//! 2. Eligible nodes sign `{"Data":..,"BlkHeight":"h"}` at every height
//! 3. The qualified pool is shuffled into sub-batches (pending)
//! 4. On the next height the pending batch becomes the active rotation;
//!    its members take turns verifying one sub-batch per height
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ir_02_verifier_rotation::{
//!     CommandHandler, EcdsaSignatureAdapter, InMemoryKVStore, RotationConfig,
//!     RotationDependencies, RotationService,
//! };
//!
//! let service = RotationService::new(RotationDependencies {
//!     store: InMemoryKVStore::new(),
//!     sig_verifier: Arc::new(EcdsaSignatureAdapter::new()),
//!     config: RotationConfig::default(),
//! });
//! let handler = CommandHandler::new(Arc::new(service));
//! let out = handler.execute(&ctx, "getNextVerifierBatch", "")?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ipc;
pub mod ports;
pub mod service;
pub mod state;

// Re-export main types
pub use adapters::{
    derive_address, EcdsaSignatureAdapter, InMemoryKVStore, KeccakRandomness,
    KeyHashAddressVerifier,
};
pub use domain::{
    ActiveBatch, AdminConfig, BatchPartition, ConfigError, DutyReport, KVStoreError,
    KeccakShuffleSource, NodeRecord, PendingBatch, RegistrationInfo, RegistrationRequest,
    RotationConfig, RotationError, RotationResult, SetupRequest, ShuffleSource,
    VerifierBatchSet,
};
pub use ipc::{CommandError, CommandHandler, Method};
pub use ports::{
    AddressVerifier, BatchOperation, KeyValueStore, RandomnessProvider, SignatureVerifier,
    VerifierRotationApi,
};
pub use service::{RotationDependencies, RotationService};
