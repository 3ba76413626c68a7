//! # Verifier Rotation Test Suite
//!
//! Cross-crate scenarios that exercise the protocol the way hosts drive it.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs       # Real secp256k1 node identities and signed payloads
//!     ├── rotation_flow.rs  # Typed API: setup → register → rotate → duty
//!     ├── command_flow.rs   # String command interface, end to end
//!     └── runtime_flow.rs   # File-backed state across invocations
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ir-tests
//! cargo test -p ir-tests integration::command_flow
//!
//! # Benchmarks
//! cargo bench -p ir-tests
//! ```

pub mod integration;
