//! Adapters for the outbound ports.

pub mod address;
pub mod randomness;
pub mod signature;
pub mod storage;

pub use address::{derive_address, KeyHashAddressVerifier};
pub use randomness::KeccakRandomness;
pub use signature::EcdsaSignatureAdapter;
pub use storage::InMemoryKVStore;
