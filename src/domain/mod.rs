//! Domain layer
//!
//! Flat, normalized projections of the entities found in an Envoy config dump.
//! Every type here owns its data; nothing borrows from the raw document once
//! extraction is done.
//!
//! ## Module Organization
//!
//! - `cluster`: upstream clusters with their resolved endpoint addresses
//! - `endpoint`: individual load-balancing endpoints and health status
//! - `listener`: listeners and their filter chains
//! - `route`: route configurations and destination clusters
//! - `secret`: SDS secrets and certificate validity

pub mod cluster;
pub mod endpoint;
pub mod listener;
pub mod route;
pub mod secret;

pub use cluster::{cluster_name, Cluster};
pub use endpoint::{Endpoint, HealthStatus};
pub use listener::{split_listener_name, FilterChain, Listener, TrafficDirection};
pub use route::Route;
pub use secret::Secret;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The entity kinds the inspector knows how to extract and render.
///
/// Variant order is the fixed presentation order used by every renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Clusters,
    Endpoints,
    Listeners,
    Routes,
    Secrets,
}

impl ResourceKind {
    /// All kinds in presentation order
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Clusters,
        ResourceKind::Endpoints,
        ResourceKind::Listeners,
        ResourceKind::Routes,
        ResourceKind::Secrets,
    ];

    /// Key used in structured output
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Clusters => "clusters",
            ResourceKind::Endpoints => "endpoints",
            ResourceKind::Listeners => "listeners",
            ResourceKind::Routes => "routes",
            ResourceKind::Secrets => "secrets",
        }
    }

    /// Heading used in tabular output
    pub fn title(&self) -> &'static str {
        match self {
            ResourceKind::Clusters => "Clusters",
            ResourceKind::Endpoints => "Endpoints",
            ResourceKind::Listeners => "Listeners",
            ResourceKind::Routes => "Routes",
            ResourceKind::Secrets => "Secrets",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
