//! Inspection pipeline
//!
//! One invocation: raw bytes → document → in-scope sections → filtered view → output.
//! Raw mode short-circuits before parsing and returns the input untouched.

use bytes::Bytes;
use tracing::{debug, info};

use crate::config_dump::Document;
use crate::errors::Result;
use crate::extract::extract_view;
use crate::filter::{self, FilterParams, KindSelection};
use crate::render::{JsonRenderer, OutputMode, TableRenderer, ViewRenderer};
use crate::source::ConfigSource;
use crate::view::ConfigView;

/// Everything that shapes the output of one invocation
#[derive(Debug, Clone, Default)]
pub struct InspectOptions {
    pub mode: OutputMode,

    pub filters: FilterParams,

    pub selection: KindSelection,

    /// Color table output
    pub color: bool,

    /// Title line printed above the tables
    pub title: Option<String>,
}

/// Parse a config dump, extract the in-scope kinds and apply the filters.
pub fn build_view(raw: &[u8], options: &InspectOptions) -> Result<ConfigView> {
    options.filters.validate()?;

    let document = Document::parse(raw)?;
    let view = extract_view(&document, &options.selection)?;
    Ok(filter::apply(view, &options.filters))
}

/// Produce the output for one invocation.
///
/// On any error nothing is rendered; the error describes every failing section.
pub fn inspect(raw: &Bytes, options: &InspectOptions) -> Result<Bytes> {
    if options.mode == OutputMode::Raw {
        debug!(bytes = raw.len(), "Raw output requested, skipping parse");
        return Ok(raw.clone());
    }

    let view = build_view(raw, options)?;

    let rendered = match options.mode {
        OutputMode::Json => JsonRenderer.render(&view)?,
        _ => TableRenderer {
            title: options.title.clone(),
            filters: options.filters.clone(),
            color: options.color,
        }
        .render(&view)?,
    };

    Ok(Bytes::from(rendered))
}

/// Fetch from the source and inspect what it returned
pub async fn inspect_source(source: &dyn ConfigSource, options: &InspectOptions) -> Result<Bytes> {
    info!(source = %source.describe(), mode = %options.mode, "Fetching config dump");
    let raw = source.fetch_raw_config().await?;
    inspect(&raw, options)
}
