//! # Structured Logging
//!
//! Subscriber setup and span macros built on the tracing ecosystem.
//!
//! Logs are always written to stderr so they never interleave with rendered output on
//! stdout. The level comes from `RUST_LOG` when set, otherwise from the verbosity flag.
//! Setting `ENVOY_INSPECT_LOG_FORMAT=json` emits one JSON object per event.

use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log line format
pub const LOG_FORMAT_ENV: &str = "ENVOY_INSPECT_LOG_FORMAT";

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Read the format from the environment; anything but `json` is plain text
    pub fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Directive used when `RUST_LOG` is not set
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed (e.g. by a test harness).
pub fn init_logging(verbose: bool, format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Json => builder.json().try_init().is_ok(),
        LogFormat::Text => builder.try_init().is_ok(),
    };

    if installed {
        tracing::debug!(?format, verbose, "Logging initialized");
    }
    installed
}

/// Create a tracing span for the extraction of one config dump section.
///
/// ```rust,ignore
/// let span = section_span!(ResourceKind::Clusters);
/// let span = section_span!(ResourceKind::Listeners, source = "dump.json");
/// ```
#[macro_export]
macro_rules! section_span {
    ($kind:expr) => {
        tracing::debug_span!("extract_section", kind = %$kind)
    };
    ($kind:expr, $($field:tt)*) => {
        tracing::debug_span!("extract_section", kind = %$kind, $($field)*)
    };
}
