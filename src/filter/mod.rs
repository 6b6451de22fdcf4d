//! # Filter Engine
//!
//! Predicate filtering over the normalized view and resolution of which entity kinds
//! are in scope for an invocation.

use serde::Serialize;
use tracing::debug;

use crate::domain::{Cluster, Endpoint, Listener, ResourceKind};
use crate::errors::{InspectError, Result};

/// Port flag value meaning "any port"
pub const ANY_PORT: i64 = -1;
use crate::view::ConfigView;

/// Row predicates supplied by the operator. `None` means the predicate is not applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterParams {
    /// Substring of a cluster's fully qualified name
    pub fqdn: Option<String>,

    /// Substring of a cluster endpoint, endpoint or listener address
    pub address: Option<String>,

    /// Exact endpoint port, as given; [`FilterParams::validate`] rejects values no port can have
    pub port: Option<i64>,
}

impl FilterParams {
    /// Build from raw flag values, where an empty string or a port of `-1` means unset.
    pub fn from_flags(fqdn: &str, address: &str, port: i64) -> Self {
        Self {
            fqdn: non_empty(fqdn),
            address: non_empty(address),
            port: (port != ANY_PORT).then_some(port),
        }
    }

    /// Whether any predicate is set
    pub fn is_active(&self) -> bool {
        self.fqdn.is_some() || self.address.is_some() || self.port.is_some()
    }

    /// Reject predicates the engine cannot evaluate: a port outside `0..=65535`.
    pub fn validate(&self) -> Result<()> {
        match self.port {
            Some(port) if u16::try_from(port).is_err() => {
                Err(InspectError::UnsupportedFilterCombination {
                    message: format!("port {} is outside 0-65535 (use -1 for any port)", port),
                })
            }
            _ => Ok(()),
        }
    }

    fn matches_address(&self, address: &str) -> bool {
        self.address.as_deref().map_or(true, |needle| address.contains(needle))
    }

    /// Narrow a cluster's endpoints to the address filter; `None` drops the cluster.
    pub fn filter_cluster(&self, mut cluster: Cluster) -> Option<Cluster> {
        if let Some(fqdn) = &self.fqdn {
            if !cluster.fully_qualified_name.contains(fqdn.as_str()) {
                return None;
            }
        }

        if self.address.is_some() {
            cluster.endpoints.retain(|endpoint| self.matches_address(endpoint));
            if cluster.endpoints.is_empty() {
                return None;
            }
        }

        Some(cluster)
    }

    pub fn matches_endpoint(&self, endpoint: &Endpoint) -> bool {
        let port_matches =
            self.port.map_or(true, |port| endpoint.port().map(i64::from) == Some(port));
        self.matches_address(&endpoint.address) && port_matches
    }

    pub fn matches_listener(&self, listener: &Listener) -> bool {
        self.matches_address(&listener.address)
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Per-kind inclusion switches.
///
/// With no switch set every kind is in scope; once any switch is set only the
/// switched-on kinds are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindSelection {
    pub clusters: bool,
    pub endpoints: bool,
    pub listeners: bool,
    pub routes: bool,
    pub secrets: bool,
}

impl KindSelection {
    fn switch(&self, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::Clusters => self.clusters,
            ResourceKind::Endpoints => self.endpoints,
            ResourceKind::Listeners => self.listeners,
            ResourceKind::Routes => self.routes,
            ResourceKind::Secrets => self.secrets,
        }
    }

    /// Whether any switch narrows the output
    pub fn is_narrowed(&self) -> bool {
        ResourceKind::ALL.into_iter().any(|kind| self.switch(kind))
    }

    pub fn includes(&self, kind: ResourceKind) -> bool {
        !self.is_narrowed() || self.switch(kind)
    }

    /// In-scope kinds in presentation order
    pub fn kinds(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        ResourceKind::ALL.into_iter().filter(|kind| self.includes(*kind))
    }
}

/// Apply the predicates to every in-scope kind of the view.
///
/// Routes and secrets pass through untouched.
pub fn apply(view: ConfigView, params: &FilterParams) -> ConfigView {
    if !params.is_active() {
        return view;
    }

    let filtered = ConfigView {
        clusters: view
            .clusters
            .map(|clusters| clusters.into_iter().filter_map(|c| params.filter_cluster(c)).collect()),
        endpoints: view.endpoints.map(|endpoints| {
            endpoints.into_iter().filter(|endpoint| params.matches_endpoint(endpoint)).collect()
        }),
        listeners: view.listeners.map(|listeners| {
            listeners.into_iter().filter(|listener| params.matches_listener(listener)).collect()
        }),
        routes: view.routes,
        secrets: view.secrets,
    };

    debug!(
        clusters = ?filtered.len(ResourceKind::Clusters),
        endpoints = ?filtered.len(ResourceKind::Endpoints),
        listeners = ?filtered.len(ResourceKind::Listeners),
        "Applied filters"
    );

    filtered
}
