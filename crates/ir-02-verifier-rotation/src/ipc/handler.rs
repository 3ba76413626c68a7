//! Command handler
//!
//! String-level entry point used by hosts: a method name plus the
//! comma-separated JSON argument list, as nodes send them:
//!
//! ```text
//! setup     ["a","b"],"<admin pk hex>","<sig hex>"
//! register  {"Data":"x","BlkHeight":"5"},"<addr>","<pk hex>","<sig hex>"
//! check     "<addr>"
//! randomizeBatch  ["1","2","3"],2
//! ```
//!
//! Protocol rejections come back as `"false"`. Malformed commands are
//! errors, never `"false"`.

use crate::domain::{KVStoreError, RegistrationRequest, RotationError, SetupRequest};
use crate::ports::VerifierRotationApi;
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use shared_types::{join_addresses, Address, ProcessContext};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

const TRUE: &str = "true";
const FALSE: &str = "false";

/// Methods exposed through the command interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Setup,
    Register,
    Check,
    RandomizeBatch,
    SetNextVerifyTargetsBatch,
    GetNextVerifyTargetBatch,
    GetNextVerifierBatch,
    DappSchedule,
}

impl Method {
    pub const ALL: [Method; 8] = [
        Method::Setup,
        Method::Register,
        Method::Check,
        Method::RandomizeBatch,
        Method::SetNextVerifyTargetsBatch,
        Method::GetNextVerifyTargetBatch,
        Method::GetNextVerifierBatch,
        Method::DappSchedule,
    ];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Setup => "setup",
            Method::Register => "register",
            Method::Check => "check",
            Method::RandomizeBatch => "randomizeBatch",
            Method::SetNextVerifyTargetsBatch => "setNextVerifyTargetsBatch",
            Method::GetNextVerifyTargetBatch => "getNextVerifyTargetBatch",
            Method::GetNextVerifierBatch => "getNextVerifierBatch",
            Method::DappSchedule => "dapp_schedule",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = CommandError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str() == name)
            .ok_or_else(|| CommandError::UnknownMethod(name.to_string()))
    }
}

/// Command-level failures. Distinct from protocol rejections.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Argument list is not valid JSON: {0}")]
    Parse(String),

    #[error("{method}: missing argument {index}")]
    MissingArgument { method: Method, index: usize },

    #[error("{method}: argument {index} is invalid: {reason}")]
    InvalidArgument {
        method: Method,
        index: usize,
        reason: String,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] KVStoreError),
}

/// Parsed argument list; each entry keeps its exact source text.
struct Args {
    method: Method,
    values: Vec<Box<RawValue>>,
}

impl Args {
    fn parse(method: Method, arg: &str) -> Result<Self, CommandError> {
        let values = if arg.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&format!("[{arg}]"))
                .map_err(|e| CommandError::Parse(e.to_string()))?
        };
        Ok(Self { method, values })
    }

    fn raw(&self, index: usize) -> Result<&str, CommandError> {
        self.values
            .get(index)
            .map(|value| value.get())
            .ok_or(CommandError::MissingArgument {
                method: self.method,
                index,
            })
    }

    fn typed<T: DeserializeOwned>(&self, index: usize) -> Result<T, CommandError> {
        serde_json::from_str(self.raw(index)?).map_err(|e| CommandError::InvalidArgument {
            method: self.method,
            index,
            reason: e.to_string(),
        })
    }

    /// Hex string argument; `None` when the string is not valid hex.
    fn hex(&self, index: usize) -> Result<Option<Vec<u8>>, CommandError> {
        let text: String = self.typed(index)?;
        Ok(hex::decode(text.trim_start_matches("0x")).ok())
    }

    /// Exact text the node signed: the content of a JSON string argument,
    /// otherwise the raw argument text.
    fn signed_text(&self, index: usize) -> Result<String, CommandError> {
        let raw = self.raw(index)?;
        Ok(serde_json::from_str::<String>(raw).unwrap_or_else(|_| raw.to_string()))
    }

    /// Non-negative count given as a number or a decimal string.
    fn count(&self, index: usize) -> Result<usize, CommandError> {
        let raw = self.raw(index)?;
        serde_json::from_str::<usize>(raw)
            .ok()
            .or_else(|| {
                serde_json::from_str::<String>(raw)
                    .ok()
                    .and_then(|text| text.trim().parse().ok())
            })
            .ok_or_else(|| CommandError::InvalidArgument {
                method: self.method,
                index,
                reason: format!("expected a non-negative integer, got {raw}"),
            })
    }
}

/// Command handler over any [`VerifierRotationApi`].
pub struct CommandHandler<A: VerifierRotationApi> {
    service: Arc<A>,
}

impl<A: VerifierRotationApi> CommandHandler<A> {
    pub fn new(service: Arc<A>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Arc<A> {
        &self.service
    }

    /// Run `method` with the comma-separated JSON argument list `arg`.
    pub fn execute(
        &self,
        ctx: &ProcessContext,
        method: &str,
        arg: &str,
    ) -> Result<String, CommandError> {
        let method: Method = method.parse()?;
        let args = Args::parse(method, arg)?;
        debug!(%method, height = ctx.current_height, "executing command");

        match method {
            Method::Setup => self.setup(ctx, &args),
            Method::Register => self.register(ctx, &args),
            Method::Check => {
                let address: Address = args.typed(0)?;
                self.service
                    .check(ctx, &address)
                    .map(bool_result)
                    .or_else(reject)
            }
            Method::RandomizeBatch => {
                let addresses: Vec<Address> = args.typed(0)?;
                let batch_count = args.count(1)?;
                self.service
                    .randomize_batch(ctx, &addresses, batch_count)
                    .map(|partition| partition.to_json_string())
                    .or_else(reject)
            }
            Method::SetNextVerifyTargetsBatch => self
                .service
                .set_next_verify_targets_batch(ctx)
                .map(|_| String::new())
                .or_else(reject),
            Method::GetNextVerifyTargetBatch => self
                .service
                .get_next_verify_target_batch(ctx)
                .map(|batch| {
                    batch
                        .map(|partition| partition.to_json_string())
                        .unwrap_or_default()
                })
                .or_else(reject),
            Method::GetNextVerifierBatch => self
                .service
                .get_next_verifier_batch(ctx)
                .map(|members| join_addresses(&members))
                .or_else(reject),
            Method::DappSchedule => self
                .service
                .dapp_schedule(ctx)
                .map(|report| bool_result(report.on_duty))
                .or_else(reject),
        }
    }

    fn setup(&self, ctx: &ProcessContext, args: &Args) -> Result<String, CommandError> {
        let addresses: Vec<Address> = args.typed(0)?;
        let (Some(admin_pub_key), Some(signature)) = (args.hex(1)?, args.hex(2)?) else {
            return Ok(FALSE.to_string());
        };

        let request = SetupRequest {
            addresses,
            admin_pub_key,
            signature,
        };
        self.service
            .setup(ctx, request)
            .map(|()| TRUE.to_string())
            .or_else(reject)
    }

    fn register(&self, ctx: &ProcessContext, args: &Args) -> Result<String, CommandError> {
        let payload = args.signed_text(0)?;
        let address: Address = args.typed(1)?;
        let (Some(public_key), Some(signature)) = (args.hex(2)?, args.hex(3)?) else {
            return Ok(FALSE.to_string());
        };

        let request = RegistrationRequest {
            payload,
            address,
            public_key,
            signature,
        };
        self.service
            .register(ctx, request)
            .map(|()| TRUE.to_string())
            .or_else(reject)
    }
}

fn bool_result(value: bool) -> String {
    let text = if value { TRUE } else { FALSE };
    text.to_string()
}

/// Protocol rejection to `"false"`; storage failures stay errors.
fn reject(error: RotationError) -> Result<String, CommandError> {
    match error {
        RotationError::Storage(e) => Err(CommandError::Storage(e)),
        other => {
            debug!(error = %other, "command rejected");
            Ok(FALSE.to_string())
        }
    }
}
