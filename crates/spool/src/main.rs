//! Spool - Resilient stream-ingestion client
//!
//! # Usage
//!
//! ```bash
//! # Ingest (default command)
//! spool
//! spool --config spool.toml
//! spool run --config spool.toml --log-level debug
//!
//! # Validate a config file without connecting
//! spool check --config spool.toml
//! ```

mod cmd;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Spool - pull an unbounded record stream into rotating files
#[derive(Parser, Debug)]
#[command(name = "spool")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Connect and ingest until interrupted (default)
    Run,

    /// Parse and validate a config file, then exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => cmd::run::run(cli.config, cli.log_level.as_deref()).await,
        Command::Check => cmd::check::run(cli.config),
    }
}
