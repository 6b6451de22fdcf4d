//! Configuration management CLI commands
//!
//! Provides commands for managing ~/.envoy-inspect/config.toml

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::Path;

use super::config::CliConfig;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize configuration file with default values
    Init {
        /// Overwrite existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration
    Show {
        /// Output format (table, json or toml)
        #[arg(short, long, default_value = "table")]
        output: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (admin_url, timeout, output or color)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Get configuration file path
    Path,
}

/// Handle config commands against the file at `config_override`, or the default path
pub async fn handle_config_command(
    command: ConfigCommands,
    config_override: Option<&Path>,
) -> Result<()> {
    let path = CliConfig::resolve_path(config_override)?;

    match command {
        ConfigCommands::Init { force } => init_config(&path, force)?,
        ConfigCommands::Show { output } => show_config(&path, &output)?,
        ConfigCommands::Set { key, value } => set_config(&path, &key, &value)?,
        ConfigCommands::Path => println!("{}", path.display()),
    }

    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at: {}\nUse --force to overwrite",
            path.display()
        );
    }

    let config = CliConfig::default();
    config.save_to_path(path)?;

    println!("✅ Configuration file created at: {}", path.display());
    println!("\nYou can now set values using:");
    println!("  envoy-inspect config set admin_url <admin-url>");
    println!("  envoy-inspect config set timeout <seconds>");
    println!("  envoy-inspect config set output <table|json|raw>");

    Ok(())
}

fn show_config(path: &Path, output_format: &str) -> Result<()> {
    if !path.exists() {
        println!("No configuration file found at: {}", path.display());
        println!("\nRun 'envoy-inspect config init' to create one");
        return Ok(());
    }

    let config = CliConfig::load_from_path(path)?;
    print!("{}", format_config(&config, path, output_format)?);
    Ok(())
}

fn format_config(config: &CliConfig, path: &Path, output_format: &str) -> Result<String> {
    match output_format.to_lowercase().as_str() {
        "json" => {
            let json =
                serde_json::to_string_pretty(config).context("Failed to serialize to JSON")?;
            Ok(format!("{}\n", json))
        }
        "toml" => toml::to_string_pretty(config).context("Failed to serialize to TOML"),
        "table" => Ok(config_table(config, path)),
        other => anyhow::bail!(
            "Unsupported output format: '{}'. Use 'table', 'json', or 'toml'.",
            other
        ),
    }
}

fn config_table(config: &CliConfig, path: &Path) -> String {
    let not_set = || "<not set>".to_string();
    let rows = [
        ("admin_url", config.admin_url.clone().unwrap_or_else(not_set)),
        ("timeout", config.timeout.map(|t| format!("{} seconds", t)).unwrap_or_else(not_set)),
        ("output", config.output.clone().unwrap_or_else(not_set)),
        ("color", config.color.map(|c| c.to_string()).unwrap_or_else(not_set)),
    ];

    let mut out = format!("\n{:<15} {}\n{}\n", "Key", "Value", "-".repeat(65));
    for (key, value) in rows {
        out.push_str(&format!("{:<15} {}\n", key, value));
    }
    out.push_str(&format!("\nConfig file: {}\n", path.display()));
    out
}

fn set_config(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut config = CliConfig::load_from_path(path).unwrap_or_default();
    config.set(key, value)?;
    config.save_to_path(path)?;

    println!("✅ {} set to: {}", key, value);
    println!("Configuration saved to: {}", path.display());
    Ok(())
}
