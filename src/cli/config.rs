//! Configuration file handling for envoy-inspect
//!
//! Manages loading and saving CLI configuration from ~/.envoy-inspect/config.toml
//! and resolving connection settings from multiple sources.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_ADMIN_URL: &str = "http://localhost:19000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_OUTPUT: &str = "table";

pub const ADMIN_URL_ENV: &str = "ENVOY_INSPECT_ADMIN_URL";
pub const TIMEOUT_ENV: &str = "ENVOY_INSPECT_TIMEOUT";
pub const OUTPUT_ENV: &str = "ENVOY_INSPECT_OUTPUT";

/// Keys accepted by `config set`
pub const CONFIG_KEYS: [&str; 4] = ["admin_url", "timeout", "output", "color"];

/// CLI configuration stored in ~/.envoy-inspect/config.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Base URL of the Envoy admin listener
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_url: Option<String>,

    /// Request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Default output mode (table, json or raw)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Color table output when writing to a terminal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

impl CliConfig {
    /// Get the default configuration file path (~/.envoy-inspect/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Unable to determine home directory")?;

        let mut path = PathBuf::from(home);
        path.push(".envoy-inspect");
        path.push("config.toml");

        Ok(path)
    }

    /// The `--config` override when given, else the default path
    pub fn resolve_path(path_override: Option<&Path>) -> Result<PathBuf> {
        match path_override {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::config_path(),
        }
    }

    /// Load configuration from a specific path; a missing file is an empty configuration
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Set one key from its string form
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "admin_url" => self.admin_url = Some(value.to_string()),
            "timeout" => {
                let timeout: u64 = value
                    .parse()
                    .context("Invalid timeout value. Must be a number in seconds")?;
                self.timeout = Some(timeout);
            }
            "output" => {
                value
                    .parse::<crate::render::OutputMode>()
                    .context("Invalid output value")?;
                self.output = Some(value.to_string());
            }
            "color" => {
                let color: bool =
                    value.parse().context("Invalid color value. Must be 'true' or 'false'")?;
                self.color = Some(color);
            }
            _ => {
                anyhow::bail!(
                    "Unknown configuration key: '{}'. Valid keys: {}",
                    key,
                    CONFIG_KEYS.join(", ")
                );
            }
        }
        Ok(())
    }
}

/// Pick the first non-empty value in priority order: flag, config file, environment.
fn first_set(
    name: &str,
    flag: Option<String>,
    file: Option<String>,
    env: Option<String>,
) -> Option<String> {
    let candidates = [("flag", flag), ("config file", file), ("environment", env)];
    for (origin, value) in candidates {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            debug!("Using {} from {}: {}", name, origin, value);
            return Some(value);
        }
    }
    None
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Resolve the admin URL
///
/// Checks sources in the following priority order:
/// 1. --admin-url command line flag
/// 2. config file
/// 3. ENVOY_INSPECT_ADMIN_URL environment variable
/// 4. Default: http://localhost:19000
pub fn resolve_admin_url(flag: Option<String>, config: &CliConfig) -> String {
    first_set("admin URL", flag, config.admin_url.clone(), env_var(ADMIN_URL_ENV))
        .unwrap_or_else(|| DEFAULT_ADMIN_URL.to_string())
}

/// Resolve the timeout in seconds
///
/// Same priority as [`resolve_admin_url`], falling back to 30 seconds. An unparsable
/// environment value is ignored.
pub fn resolve_timeout(flag: Option<u64>, config: &CliConfig) -> u64 {
    if let Some(timeout) = flag.or(config.timeout) {
        debug!("Using timeout: {} seconds", timeout);
        return timeout;
    }
    env_var(TIMEOUT_ENV)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}

/// Resolve the output mode string; validated when parsed into an output mode
pub fn resolve_output(flag: Option<String>, config: &CliConfig) -> String {
    first_set("output mode", flag, config.output.clone(), env_var(OUTPUT_ENV))
        .unwrap_or_else(|| DEFAULT_OUTPUT.to_string())
}
