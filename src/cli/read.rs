//! `read` command: fetch a config dump and print the selected view

use anyhow::{Context, Result};
use clap::Args;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use super::config::{self, CliConfig};
use crate::filter::{FilterParams, KindSelection};
use crate::inspect::{inspect_source, InspectOptions};
use crate::render::OutputMode;
use crate::source::{AdminApiConfig, AdminApiSource, ConfigSource, FileSource};

#[derive(Args, Debug, Clone, Default)]
pub struct ReadArgs {
    /// Envoy admin API base URL (e.g. a `kubectl port-forward` to port 19000)
    #[arg(long, conflicts_with = "file")]
    pub admin_url: Option<String>,

    /// Read a saved config dump instead of calling the admin API
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Output mode (table, json or raw)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Show clusters
    #[arg(long)]
    pub clusters: bool,

    /// Show endpoints
    #[arg(long)]
    pub endpoints: bool,

    /// Show listeners
    #[arg(long)]
    pub listeners: bool,

    /// Show routes
    #[arg(long)]
    pub routes: bool,

    /// Show secrets
    #[arg(long)]
    pub secrets: bool,

    /// Only clusters whose fully qualified name contains this string
    #[arg(long, default_value = "")]
    pub fqdn: String,

    /// Only addresses containing this string
    #[arg(long, default_value = "")]
    pub address: String,

    /// Only endpoints on this port (-1 for any)
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub port: i64,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl ReadArgs {
    pub fn selection(&self) -> KindSelection {
        KindSelection {
            clusters: self.clusters,
            endpoints: self.endpoints,
            listeners: self.listeners,
            routes: self.routes,
            secrets: self.secrets,
        }
    }

    pub fn filters(&self) -> FilterParams {
        FilterParams::from_flags(&self.fqdn, &self.address, self.port)
    }
}

/// Handle the read command
pub async fn handle_read_command(
    args: ReadArgs,
    config_override: Option<&Path>,
    timeout_flag: Option<u64>,
) -> Result<()> {
    let config_path = CliConfig::resolve_path(config_override)?;
    let config = CliConfig::load_from_path(&config_path)?;

    let mode: OutputMode = config::resolve_output(args.output.clone(), &config).parse()?;
    let source = build_source(&args, &config, timeout_flag)?;

    let options = InspectOptions {
        mode,
        filters: args.filters(),
        selection: args.selection(),
        color: use_color(args.no_color, &config),
        title: Some(format!("Envoy configuration for {}:", source.describe())),
    };
    debug!(?options, "Resolved read options");

    let output = inspect_source(source.as_ref(), &options).await?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&output).context("Failed to write output")?;
    stdout.flush().context("Failed to write output")?;
    Ok(())
}

fn build_source(
    args: &ReadArgs,
    config: &CliConfig,
    timeout_flag: Option<u64>,
) -> Result<Box<dyn ConfigSource>> {
    if let Some(path) = &args.file {
        return Ok(Box::new(FileSource::new(path)));
    }

    let admin_config = AdminApiConfig {
        admin_url: config::resolve_admin_url(args.admin_url.clone(), config),
        timeout: Duration::from_secs(config::resolve_timeout(timeout_flag, config)),
        ..Default::default()
    };
    Ok(Box::new(AdminApiSource::new(admin_config)?))
}

/// Color only when nothing disables it and stdout is a terminal
fn use_color(no_color_flag: bool, config: &CliConfig) -> bool {
    color_allowed(
        no_color_flag,
        config.color,
        std::env::var_os("NO_COLOR").is_some(),
        std::io::stdout().is_terminal(),
    )
}

fn color_allowed(
    no_color_flag: bool,
    configured: Option<bool>,
    no_color_env: bool,
    is_terminal: bool,
) -> bool {
    !no_color_flag && configured.unwrap_or(true) && !no_color_env && is_terminal
}
