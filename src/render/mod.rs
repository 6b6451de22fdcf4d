//! # View Renderer
//!
//! Output modes for a filtered [`ConfigView`]. Raw mode never reaches a renderer: the
//! original bytes are passed through by the inspection pipeline before parsing.

pub mod json;
pub mod table;

pub use json::JsonRenderer;
pub use table::{Table, TableRenderer};

use std::fmt;
use std::str::FromStr;

use crate::errors::{InspectError, Result};
use crate::view::ConfigView;

/// Output mode options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Table,
    Json,
    Raw,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Table => "table",
            OutputMode::Json => "json",
            OutputMode::Raw => "raw",
        }
    }
}

impl FromStr for OutputMode {
    type Err = InspectError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(OutputMode::Table),
            "json" => Ok(OutputMode::Json),
            "raw" => Ok(OutputMode::Raw),
            _ => Err(InspectError::unknown_output_mode(s)),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Turns a filtered view into presentation text
pub trait ViewRenderer {
    fn render(&self, view: &ConfigView) -> Result<String>;
}
