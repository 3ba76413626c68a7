//! Ports layer (Hexagonal Architecture)
//!
//! - **Inbound (Driving)**: [`VerifierRotationApi`], the operations hosts call
//! - **Outbound (Driven)**: storage, signature verification and randomness

mod inbound;
mod outbound;

pub use inbound::*;
pub use outbound::*;
