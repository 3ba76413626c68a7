//! Command interface for hosts that speak method names and JSON arguments.

pub mod handler;

pub use handler::{CommandError, CommandHandler, Method};
