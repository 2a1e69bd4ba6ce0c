//! `punter-admin`: admin console for the punter platform
//!
//! Reviews KYC submissions and transactions, manages admin and user accounts,
//! composes bulk email and prints platform metrics.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use anyhow::Result;
use clap::Parser;
use punter_client::{AppContext, ClientError, Config, LoggingOverrides, init_logging};
use punter_console::{Cli, Renderer, TerminalPrompt, execute};
use std::io;
use std::process::ExitCode;
use tracing::{debug, error, info};

/// Main entry point for the admin console
#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if it exists (for development convenience)
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("warning: {e}");
    }
    match dotenv {
        Ok(path) => debug!(path = %path.display(), ".env loaded"),
        Err(e) => debug!(error = %e, ".env not loaded"),
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        source = ?config.source.kind,
        "punter admin console starting"
    );

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "command failed");
            eprintln!("error: {}", operator_message(&e));
            ExitCode::FAILURE
        }
    }
}

/// Resolve configuration and apply command line overrides
///
/// # Errors
///
/// Returns error if a configuration source cannot be read or the result is invalid
fn load_config(cli: &Cli) -> Result<Config> {
    let overrides = LoggingOverrides {
        level: cli.log_level.clone(),
        format: cli.log_format,
    };
    Ok(Config::load_with_overrides(cli.config.as_deref(), &overrides)?)
}

/// Build the context and run the subcommand
///
/// # Errors
///
/// Returns error if the context cannot be built or the command fails
async fn run(cli: Cli, config: Config) -> Result<()> {
    let mut ctx = AppContext::from_config(config).await?;
    let mut renderer = Renderer::new(io::stdout(), cli.format);
    let mut prompt = TerminalPrompt;
    execute(&mut ctx, cli.command, &mut renderer, &mut prompt).await
}

/// Backend failures collapse to one generic message; local rule violations
/// keep their own text
fn operator_message(err: &anyhow::Error) -> String {
    err.downcast_ref::<ClientError>()
        .map_or_else(|| format!("{err:#}"), ClientError::user_message)
}
