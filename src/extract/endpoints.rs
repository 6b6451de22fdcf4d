//! Endpoint extraction

use serde_json::Value;

use super::decode_section;
use crate::config_dump::schema::{ClusterLoadAssignment, EndpointsConfigDump};
use crate::domain::{Endpoint, ResourceKind};
use crate::errors::Result;

/// Weight Envoy applies when an endpoint does not set one
const DEFAULT_WEIGHT: f64 = 1.0;

/// Extract endpoints from an `EndpointsConfigDump` block.
///
/// Emits one endpoint per load-balancing endpoint across every locality group of
/// every static and dynamic load assignment.
pub fn extract(section: Option<&Value>) -> Result<Vec<Endpoint>> {
    let dump: EndpointsConfigDump = decode_section(ResourceKind::Endpoints, section)?;

    Ok(dump
        .static_endpoint_configs
        .iter()
        .chain(dump.dynamic_endpoint_configs.iter())
        .filter_map(|entry| entry.endpoint_config.as_ref())
        .flat_map(normalize)
        .collect())
}

fn normalize(assignment: &ClusterLoadAssignment) -> Vec<Endpoint> {
    let cluster = assignment.cluster_name.clone().unwrap_or_default();

    assignment
        .lb_endpoints()
        .map(|lb_endpoint| Endpoint {
            address: lb_endpoint.address().unwrap_or_default(),
            cluster: cluster.clone(),
            weight: lb_endpoint.load_balancing_weight.unwrap_or(DEFAULT_WEIGHT),
            status: lb_endpoint.health_status.clone().unwrap_or_default(),
        })
        .collect()
}
