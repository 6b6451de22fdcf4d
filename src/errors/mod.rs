//! # Error Handling
//!
//! Error types for the inspection engine, defined with `thiserror`.
//!
//! Only [`InspectError::MalformedDocument`] is fatal before extraction starts. Section
//! failures are collected per kind so that one bad section never hides the state of
//! its siblings from the operator.

use crate::domain::ResourceKind;
use crate::source::FetchError;

/// Custom result type for inspection operations
pub type Result<T> = std::result::Result<T, InspectError>;

/// Main error type for the inspection engine
#[derive(thiserror::Error, Debug)]
pub enum InspectError {
    /// The admin response is not a JSON object carrying a `configs` array
    #[error("Malformed config dump: {message}")]
    MalformedDocument {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// A section is present but its shape makes extraction impossible
    #[error("Malformed {kind} section: {message}")]
    MalformedSection { kind: ResourceKind, message: String },

    /// More than one section failed; holds at most one error per kind
    #[error("{}", join_errors(.0))]
    Sections(Vec<InspectError>),

    /// Output mode outside of `table`, `json` and `raw`
    #[error("Unknown output mode '{mode}'. Use 'table', 'json', or 'raw'.")]
    UnknownOutputMode { mode: String },

    /// A filter predicate that no entity could satisfy, e.g. a port outside `0..=65535`
    #[error("Unsupported filter combination: {message}")]
    UnsupportedFilterCombination { message: String },

    /// Error raised by the collaborator supplying the raw bytes, passed through untouched
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl InspectError {
    /// Create a malformed document error without an underlying parser error
    pub fn malformed_document<S: Into<String>>(message: S) -> Self {
        Self::MalformedDocument { message: message.into(), source: None }
    }

    /// Create a malformed section error for the given kind
    pub fn malformed_section<S: Into<String>>(kind: ResourceKind, message: S) -> Self {
        Self::MalformedSection { kind, message: message.into() }
    }

    /// Create an unknown output mode error
    pub fn unknown_output_mode<S: Into<String>>(mode: S) -> Self {
        Self::UnknownOutputMode { mode: mode.into() }
    }

    /// Collapse per-kind failures into a single error.
    ///
    /// Returns `None` when nothing failed.
    pub fn from_failures(mut failures: Vec<InspectError>) -> Option<Self> {
        match failures.len() {
            0 => None,
            1 => failures.pop(),
            _ => Some(Self::Sections(failures)),
        }
    }

    /// Kind the error is attributed to, when it belongs to a single section
    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            InspectError::MalformedSection { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for InspectError {
    fn from(error: serde_json::Error) -> Self {
        Self::MalformedDocument { message: error.to_string(), source: Some(error) }
    }
}

fn join_errors(errors: &[InspectError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}
