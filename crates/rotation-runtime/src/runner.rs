//! One command against the persisted protocol state.

use crate::config::{RuntimeConfig, RuntimeConfigError};
use crate::store::FileBackedKVStore;
use ir_02_verifier_rotation::{
    CommandError, CommandHandler, EcdsaSignatureAdapter, KVStoreError, RotationDependencies,
    RotationService,
};
use shared_types::ProcessContext;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// A single host call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub ctx: ProcessContext,
    pub method: String,
    /// Comma-separated JSON argument list
    pub arg: String,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration: {0}")]
    Config(#[from] RuntimeConfigError),

    #[error("state store: {0}")]
    Store(#[from] KVStoreError),

    #[error("command: {0}")]
    Command(#[from] CommandError),
}

/// Load the state file, execute `invocation` and return its result string.
///
/// Accepted writes are persisted by the store before this returns.
pub fn run(config: &RuntimeConfig, invocation: &Invocation) -> Result<String, RunError> {
    config.validate()?;

    let store = FileBackedKVStore::open(&config.state_file)?;
    let service = RotationService::new(RotationDependencies {
        store,
        sig_verifier: Arc::new(EcdsaSignatureAdapter::new()),
        config: config.rotation.clone(),
    });
    let handler = CommandHandler::new(Arc::new(service));

    let output = handler.execute(&invocation.ctx, &invocation.method, &invocation.arg)?;
    info!(
        method = %invocation.method,
        height = invocation.ctx.current_height,
        output = %output,
        "command executed"
    );
    Ok(output)
}
