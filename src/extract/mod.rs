//! # Section Extractors
//!
//! Each extractor decodes one config dump block into the typed schema and normalizes
//! it into flat domain entities. A missing block yields an empty list; only data with
//! an impossible shape is an error.

pub mod clusters;
pub mod endpoints;
pub mod listeners;
pub mod routes;
pub mod secrets;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config_dump::Document;
use crate::domain::ResourceKind;
use crate::errors::{InspectError, Result};
use crate::filter::KindSelection;
use crate::view::ConfigView;

/// Decode a block into its schema type; an absent block decodes to the empty default.
pub(crate) fn decode_section<T>(kind: ResourceKind, section: Option<&Value>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match section {
        None => Ok(T::default()),
        Some(value) => {
            T::deserialize(value).map_err(|e| InspectError::malformed_section(kind, e.to_string()))
        }
    }
}

/// Extract every in-scope kind from the document.
///
/// All selected kinds are attempted even after one fails. When any kind fails the
/// collected failures are returned instead of a view.
pub fn extract_view(document: &Document, selection: &KindSelection) -> Result<ConfigView> {
    let mut view = ConfigView::default();
    let mut failures = Vec::new();

    for kind in selection.kinds() {
        let span = crate::section_span!(kind);
        let _guard = span.enter();

        let section = document.resource_section(kind);
        let outcome = match kind {
            ResourceKind::Clusters => {
                clusters::extract(section).map(|items| view.clusters = Some(items))
            }
            ResourceKind::Endpoints => {
                endpoints::extract(section).map(|items| view.endpoints = Some(items))
            }
            ResourceKind::Listeners => {
                listeners::extract(section).map(|items| view.listeners = Some(items))
            }
            ResourceKind::Routes => routes::extract(section).map(|items| view.routes = Some(items)),
            ResourceKind::Secrets => {
                secrets::extract(section).map(|items| view.secrets = Some(items))
            }
        };

        match outcome {
            Ok(()) => debug!(
                present = section.is_some(),
                count = view.len(kind).unwrap_or_default(),
                "Extracted section"
            ),
            Err(e) => {
                warn!(error = %e, "Failed to extract section");
                failures.push(e);
            }
        }
    }

    match InspectError::from_failures(failures) {
        Some(error) => Err(error),
        None => Ok(view),
    }
}
