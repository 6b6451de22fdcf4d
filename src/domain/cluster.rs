//! Cluster domain types

use serde::{Deserialize, Serialize};

/// An upstream cluster as seen by the proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Short name: the fully-qualified name up to the first `.`
    pub name: String,

    /// Name exactly as configured in the proxy
    pub fully_qualified_name: String,

    /// Resolved endpoints as `address:port`, in configuration order
    pub endpoints: Vec<String>,

    /// Discovery type (`EDS`, `STATIC`, `LOGICAL_DNS`, or a custom cluster type name)
    #[serde(rename = "type")]
    pub cluster_type: String,

    pub last_updated: String,
}

impl Cluster {
    /// Build a cluster, deriving the short name from the fully-qualified one
    pub fn new(
        fully_qualified_name: impl Into<String>,
        endpoints: Vec<String>,
        cluster_type: impl Into<String>,
        last_updated: impl Into<String>,
    ) -> Self {
        let fully_qualified_name = fully_qualified_name.into();
        Self {
            name: cluster_name(&fully_qualified_name).to_string(),
            fully_qualified_name,
            endpoints,
            cluster_type: cluster_type.into(),
            last_updated: last_updated.into(),
        }
    }
}

/// Derive a cluster's short name from its fully-qualified name.
///
/// A name without any `.` is returned whole.
pub fn cluster_name(fully_qualified_name: &str) -> &str {
    fully_qualified_name.split_once('.').map_or(fully_qualified_name, |(name, _)| name)
}
