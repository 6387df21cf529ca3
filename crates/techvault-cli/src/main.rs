//! TechVault CLI: application entry point.

mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use techvault_core::error::VaultError;
use techvault_session::{TechVault, TechVaultConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            if err.downcast_ref::<VaultError>().is_some_and(VaultError::is_auth) {
                eprintln!("Run `techvault login` to start a new session.");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = TechVaultConfig::load(cli.config.as_deref()).context("loading configuration")?;
    tracing::debug!(base_url = %config.client.base_url, "Loaded configuration");
    let vault = TechVault::connect(&config).context("connecting to TechVault")?;

    let mut stdout = std::io::stdout().lock();
    commands::run(&vault, cli.command, &mut stdout).await
}

/// `RUST_LOG` wins; otherwise `-v` flags pick the level. Logs go to stderr
/// so command output stays pipeable.
fn init_logging(verbose: u8, json: bool) {
    let level = match verbose {
        0 => "techvault=info",
        1 => "techvault=debug",
        _ => "techvault=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
