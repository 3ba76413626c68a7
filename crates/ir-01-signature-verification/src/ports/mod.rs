//! # Ports Layer
//!
//! - **Inbound (Driving)**: API that the rotation core calls

pub mod inbound;
