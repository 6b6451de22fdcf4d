//! # Command Line Interface
//!
//! Provides the `read` command for inspecting a sidecar's Envoy configuration and the
//! `config` command for managing CLI defaults.

pub mod config;
pub mod config_cmd;
pub mod read;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::observability::{init_logging, LogFormat};

#[derive(Parser)]
#[command(name = "envoy-inspect")]
#[command(about = "Inspect the live configuration of a sidecar Envoy proxy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file (default: ~/.envoy-inspect/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read the proxy's config dump and print clusters, endpoints, listeners, routes and secrets
    Read(read::ReadArgs),

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: config_cmd::ConfigCommands,
    },
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    initialise_logging(cli.verbose);

    match cli.command {
        Commands::Read(args) => {
            read::handle_read_command(args, cli.config.as_deref(), cli.timeout).await?
        }
        Commands::Config { command } => {
            config_cmd::handle_config_command(command, cli.config.as_deref()).await?
        }
    }

    Ok(())
}

fn initialise_logging(verbose: bool) {
    if !init_logging(verbose, LogFormat::from_env()) {
        tracing::debug!("Global subscriber already installed");
    }
}
