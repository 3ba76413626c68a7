//! # Shared Types Crate
//!
//! Types shared across the rotation subsystems.
//!
//! ## Design Principles
//!
//! - **Opaque identity**: an [`Address`] is compared byte-for-byte and never
//!   interpreted by the core.
//! - **Injected context**: height, seed and caller arrive with every call in a
//!   [`ProcessContext`]; nothing here reads clocks or performs I/O.

pub mod entities;

pub use entities::*;
