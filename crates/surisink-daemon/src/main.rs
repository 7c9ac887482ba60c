//! Surisink: uploads files extracted by Suricata to S3-compatible storage.
//!
//! Set CONFIG_PATH (or pass --config) to a dotenv-style file of SURISINK_*
//! variables. Variables already in the environment win over the file.

use anyhow::Context;
use clap::Parser;
use surisink_core::Config;
use surisink_daemon::{init_tracing, run_daemon, run_gc, Cli, Command};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .context("CONFIG_PATH env or --config must be set")?;
    let config = Config::load(&config_path)?;
    init_tracing(&config.logging).context("Failed to initialize logging")?;

    match cli.command() {
        Command::Run => run_daemon(config).await,
        Command::Gc { retention_days } => {
            let removed = run_gc(&config, retention_days).await?;
            println!("Removed {} dedupe rows", removed);
            Ok(())
        }
    }
}
