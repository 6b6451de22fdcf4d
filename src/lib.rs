//! # envoy-inspect
//!
//! Read-only inspector for the live configuration of a sidecar Envoy proxy.
//!
//! The admin endpoint `/config_dump?include_eds` returns one JSON document describing
//! every cluster, endpoint, listener, route and secret the proxy currently holds. This
//! crate turns that document into a normalized view, narrows it with operator filters
//! and renders it as aligned tables, re-serialized JSON or the untouched raw bytes.
//!
//! ## Architecture
//!
//! ```text
//! ConfigSource → Document → extract (per kind) → filter → render
//!  admin API       configs     clusters, ...      fqdn       table
//!  file                                           address    json
//!                                                 port       raw (passthrough)
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use envoy_inspect::{inspect_source, FileSource, InspectOptions, OutputMode};
//!
//! # async fn run() -> envoy_inspect::Result<()> {
//! let source = FileSource::new("config_dump.json");
//! let options = InspectOptions { mode: OutputMode::Json, ..Default::default() };
//! let output = inspect_source(&source, &options).await?;
//! print!("{}", String::from_utf8_lossy(&output));
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config_dump;
pub mod domain;
pub mod errors;
pub mod extract;
pub mod filter;
pub mod inspect;
pub mod observability;
pub mod render;
pub mod source;
pub mod view;

// Re-export commonly used types and traits
pub use domain::ResourceKind;
pub use errors::{InspectError, Result};
pub use filter::{FilterParams, KindSelection};
pub use inspect::{build_view, inspect, inspect_source, InspectOptions};
pub use render::{OutputMode, ViewRenderer};
pub use source::{AdminApiConfig, AdminApiSource, ConfigSource, FetchError, FileSource};
pub use view::ConfigView;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
