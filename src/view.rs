//! Normalized view of one config dump.
//!
//! A `None` collection means the kind is out of scope for this invocation; an empty
//! collection means it is in scope but the proxy has none.

use serde::Serialize;

use crate::domain::{Cluster, Endpoint, Listener, ResourceKind, Route, Secret};

/// Entities extracted from a config dump, grouped by kind.
///
/// Field order matches [`ResourceKind::ALL`] so structured output keeps a stable order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clusters: Option<Vec<Cluster>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<Vec<Endpoint>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub listeners: Option<Vec<Listener>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<Route>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets: Option<Vec<Secret>>,
}

impl ConfigView {
    /// Whether the kind is in scope
    pub fn includes(&self, kind: ResourceKind) -> bool {
        self.len(kind).is_some()
    }

    /// Number of entities of the kind, `None` when out of scope
    pub fn len(&self, kind: ResourceKind) -> Option<usize> {
        match kind {
            ResourceKind::Clusters => self.clusters.as_ref().map(Vec::len),
            ResourceKind::Endpoints => self.endpoints.as_ref().map(Vec::len),
            ResourceKind::Listeners => self.listeners.as_ref().map(Vec::len),
            ResourceKind::Routes => self.routes.as_ref().map(Vec::len),
            ResourceKind::Secrets => self.secrets.as_ref().map(Vec::len),
        }
    }

    /// In-scope kinds in presentation order
    pub fn kinds(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        ResourceKind::ALL.into_iter().filter(|kind| self.includes(*kind))
    }
}
