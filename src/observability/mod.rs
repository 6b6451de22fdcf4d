//! # Observability
//!
//! Structured logging for the inspector. Everything is written to stderr.

pub mod logging;

pub use logging::{init_logging, LogFormat};
