//! # rotation-node
//!
//! Runs one verifier-rotation command against a state file.
//!
//! ```bash
//! rotation-node --state state.json --height 2 --seed 130 \
//!     register '{"Data":"hello world","BlkHeight":"2"},"<addr>","<pk>","<sig>"'
//! rotation-node --height 3 --seed 130 --caller <addr> dapp_schedule
//! ```
//!
//! The result string goes to stdout, logs go to stderr. Malformed commands
//! exit non-zero.

use anyhow::{Context, Result};
use clap::Parser;
use rotation_runtime::{run, ConfigOverrides, Invocation, RuntimeConfig};
use shared_types::ProcessContext;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Verifier rotation command runner
#[derive(Parser, Debug)]
#[command(name = "rotation-node")]
#[command(about = "Run one verifier-rotation command against a state file")]
struct Args {
    /// State file (default: $ROTATION_STATE_FILE or rotation-state.json)
    #[arg(long)]
    state: Option<PathBuf>,

    /// Current height of the external counter
    #[arg(long)]
    height: u64,

    /// Host-supplied pseudo-random seed
    #[arg(long, allow_negative_numbers = true)]
    seed: i64,

    /// Address of the node executing the call
    #[arg(long)]
    caller: Option<String>,

    /// Sub-batches per rotation
    #[arg(long)]
    target_batches: Option<usize>,

    /// Heights after registration during which a node counts as live
    #[arg(long)]
    freshness_window: Option<u64>,

    /// Only accept this admin public key (hex) in setup
    #[arg(long)]
    trusted_admin_key: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,

    /// Method name, e.g. register or getNextVerifierBatch
    method: String,

    /// Comma-separated JSON argument list
    #[arg(default_value = "", allow_hyphen_values = true)]
    arg: String,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            state_file: self.state.clone(),
            log_level: self.log_level.clone(),
            target_batch_count: self.target_batches,
            freshness_window: self.freshness_window,
            trusted_admin_key: self.trusted_admin_key.clone(),
        }
    }

    fn invocation(self) -> Invocation {
        let mut ctx = ProcessContext::new(self.height, self.seed);
        if let Some(caller) = self.caller {
            ctx = ctx.with_caller(caller);
        }
        Invocation {
            ctx,
            method: self.method,
            arg: self.arg,
        }
    }
}

fn init_tracing(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .with_context(|| format!("invalid log level {default_level:?}"))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = RuntimeConfig::from_env().context("loading configuration")?;
    config
        .apply(args.overrides())
        .context("applying command-line overrides")?;

    init_tracing(&config.log_level)?;

    let invocation = args.invocation();
    let output = run(&config, &invocation)
        .with_context(|| format!("running {}", invocation.method))?;
    println!("{output}");
    Ok(())
}
