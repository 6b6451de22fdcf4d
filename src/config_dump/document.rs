//! Raw document loader.
//!
//! Parses the admin `/config_dump` response and partitions its `configs` array by
//! the `@type` discriminator of each block. Blocks are kept as nested JSON; the
//! extractors decode them into the typed schema.

use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::domain::ResourceKind;
use crate::errors::{InspectError, Result};

/// Kind of a top-level config dump block, keyed by its `@type` message name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Bootstrap,
    Clusters,
    Endpoints,
    Listeners,
    Routes,
    ScopedRoutes,
    Secrets,
}

impl SectionKind {
    /// Resolve a type URL such as `type.googleapis.com/envoy.admin.v3.ClustersConfigDump`.
    ///
    /// Only the trailing message name is compared, so every admin API version is accepted.
    pub fn from_type_url(type_url: &str) -> Option<Self> {
        let message = type_url.rsplit(['.', '/']).next().unwrap_or(type_url);
        match message {
            "BootstrapConfigDump" => Some(SectionKind::Bootstrap),
            "ClustersConfigDump" => Some(SectionKind::Clusters),
            "EndpointsConfigDump" => Some(SectionKind::Endpoints),
            "ListenersConfigDump" => Some(SectionKind::Listeners),
            "RoutesConfigDump" => Some(SectionKind::Routes),
            "ScopedRoutesConfigDump" => Some(SectionKind::ScopedRoutes),
            "SecretsConfigDump" => Some(SectionKind::Secrets),
            _ => None,
        }
    }
}

impl From<ResourceKind> for SectionKind {
    fn from(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Clusters => SectionKind::Clusters,
            ResourceKind::Endpoints => SectionKind::Endpoints,
            ResourceKind::Listeners => SectionKind::Listeners,
            ResourceKind::Routes => SectionKind::Routes,
            ResourceKind::Secrets => SectionKind::Secrets,
        }
    }
}

/// A parsed config dump with its blocks indexed by kind
#[derive(Debug, Clone, Default)]
pub struct Document {
    sections: HashMap<SectionKind, Value>,
}

impl Document {
    /// Parse raw admin API bytes.
    ///
    /// Fails with [`InspectError::MalformedDocument`] when the bytes are not JSON, the
    /// top level is not an object, or `configs` is missing or not an array. Blocks with
    /// an unknown or missing `@type` are skipped. When a kind appears more than once the
    /// later block replaces the earlier one.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let root: Value = serde_json::from_slice(bytes)?;

        let Value::Object(mut root) = root else {
            return Err(InspectError::malformed_document("top level is not a JSON object"));
        };

        let configs = match root.remove("configs") {
            Some(Value::Array(configs)) => configs,
            Some(_) => {
                return Err(InspectError::malformed_document("`configs` is not an array"));
            }
            None => return Err(InspectError::malformed_document("missing `configs` array")),
        };

        let mut sections = HashMap::new();
        for (index, block) in configs.into_iter().enumerate() {
            let type_url = block.get("@type").and_then(Value::as_str);
            match type_url.and_then(SectionKind::from_type_url) {
                Some(kind) => {
                    if sections.insert(kind, block).is_some() {
                        debug!(?kind, index, "Duplicate config dump block replaces earlier one");
                    }
                }
                None => {
                    debug!(index, type_url = ?type_url, "Skipping unrecognized config dump block");
                }
            }
        }

        debug!(sections = sections.len(), "Parsed config dump");
        Ok(Self { sections })
    }

    /// Block for the given kind, if the dump carries one
    pub fn section(&self, kind: SectionKind) -> Option<&Value> {
        self.sections.get(&kind)
    }

    /// Block backing one of the extractable entity kinds
    pub fn resource_section(&self, kind: ResourceKind) -> Option<&Value> {
        self.section(kind.into())
    }

    pub fn contains(&self, kind: SectionKind) -> bool {
        self.sections.contains_key(&kind)
    }
}
