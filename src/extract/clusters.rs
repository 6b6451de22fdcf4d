//! Cluster extraction

use serde_json::Value;

use super::decode_section;
use crate::config_dump::schema::{ClusterConfig, ClusterEntry, ClustersConfigDump};
use crate::domain::{Cluster, ResourceKind};
use crate::errors::Result;

/// Extract clusters from a `ClustersConfigDump` block.
///
/// Static clusters come first, then dynamic active ones. Names repeated across the two
/// lists are kept as separate rows.
pub fn extract(section: Option<&Value>) -> Result<Vec<Cluster>> {
    let dump: ClustersConfigDump = decode_section(ResourceKind::Clusters, section)?;

    Ok(dump
        .static_clusters
        .iter()
        .chain(dump.dynamic_active_clusters.iter())
        .map(normalize)
        .collect())
}

fn normalize(entry: &ClusterEntry) -> Cluster {
    let empty = ClusterConfig::default();
    let config = entry.cluster.as_ref().unwrap_or(&empty);

    let endpoints = config
        .load_assignment
        .as_ref()
        .map(|assignment| assignment.lb_endpoints().filter_map(|ep| ep.address()).collect())
        .unwrap_or_default();

    let cluster_type = config
        .discovery_type
        .as_deref()
        .or_else(|| config.cluster_type.as_ref().and_then(|custom| custom.name.as_deref()))
        .unwrap_or_default();

    Cluster::new(
        config.name.as_deref().unwrap_or_default(),
        endpoints,
        cluster_type,
        entry.last_updated.as_deref().unwrap_or_default(),
    )
}
