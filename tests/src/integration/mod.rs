//! Cross-crate protocol flows.


mod command_flow;
mod rotation_flow;
mod runtime_flow;
