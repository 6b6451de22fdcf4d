//! Route extraction

use serde_json::Value;

use super::decode_section;
use crate::config_dump::schema::{RouteConfigEntry, RoutesConfigDump};
use crate::domain::{ResourceKind, Route};
use crate::errors::Result;

/// Extract one route per route configuration from a `RoutesConfigDump` block.
///
/// The destination is the destination cluster concatenated with the path match of a
/// virtual-host route. When a configuration holds several routes the last one wins.
pub fn extract(section: Option<&Value>) -> Result<Vec<Route>> {
    let dump: RoutesConfigDump = decode_section(ResourceKind::Routes, section)?;

    Ok(dump
        .static_route_configs
        .iter()
        .chain(dump.dynamic_route_configs.iter())
        .map(normalize)
        .collect())
}

fn normalize(entry: &RouteConfigEntry) -> Route {
    let config = entry.route_config.as_ref();

    let destination_cluster = config
        .and_then(|config| config.routes().last())
        .map(|route| format!("{}{}", route.cluster().unwrap_or_default(), route.path_match()))
        .unwrap_or_default();

    Route {
        name: config.and_then(|config| config.name.clone()).unwrap_or_default(),
        destination_cluster,
        last_updated: entry.last_updated.clone().unwrap_or_default(),
    }
}
