//! # Config Sources
//!
//! Collaborators that supply the raw admin `/config_dump` bytes. The engine never
//! performs I/O itself; the CLI picks a source and hands its bytes to the pipeline.

pub mod admin;
pub mod file;

pub use admin::{AdminApiConfig, AdminApiSource};
pub use file::FileSource;

use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;

/// Errors raised while fetching a config dump
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("Invalid admin URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to reach Envoy admin API at {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Envoy admin API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to read config dump from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Supplies the raw bytes of one config dump
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Fetch the dump exactly as the proxy produced it
    async fn fetch_raw_config(&self) -> Result<Bytes, FetchError>;

    /// Human-readable origin, used in titles and logs
    fn describe(&self) -> String;
}
