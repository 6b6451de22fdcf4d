//! Structured output

use serde::Serialize;

use super::ViewRenderer;
use crate::errors::{InspectError, Result};
use crate::view::ConfigView;

/// Renders the view as a JSON object keyed by kind, indented with tabs.
///
/// Only in-scope kinds appear as keys, in presentation order.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl ViewRenderer for JsonRenderer {
    fn render(&self, view: &ConfigView) -> Result<String> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        view.serialize(&mut serializer)?;

        let mut rendered = String::from_utf8(buffer)
            .map_err(|e| InspectError::malformed_document(format!("non UTF-8 output: {}", e)))?;
        rendered.push('\n');
        Ok(rendered)
    }
}
