//! Listener extraction
//!
//! Every listener is flattened into its filter chains. Which parts of a chain are
//! summarized depends on the listener's traffic direction: inbound chains report their
//! network and HTTP RBAC rules, outbound chains report the destination prefixes they match.
//! Destination clusters are reported for both.

use serde_json::Value;

use super::decode_section;
use crate::config_dump::schema::{
    FilterChainConfig, HttpConnectionManager, ListenerConfig, ListenersConfigDump, NetworkFilter,
    NetworkFilterKind, RbacFilter, TcpProxy,
};
use crate::domain::{split_listener_name, FilterChain, Listener, ResourceKind, TrafficDirection};
use crate::errors::{InspectError, Result};

/// RBAC action Envoy applies when a policy set does not name one
const DEFAULT_RBAC_ACTION: &str = "ALLOW";

/// Extract listeners from a `ListenersConfigDump` block.
///
/// Static listeners come first, then dynamic listeners that have an active state.
/// Warming and draining listener versions are not shown.
pub fn extract(section: Option<&Value>) -> Result<Vec<Listener>> {
    let dump: ListenersConfigDump = decode_section(ResourceKind::Listeners, section)?;

    let static_listeners = dump
        .static_listeners
        .iter()
        .filter_map(|entry| Some((entry.listener.as_ref()?, entry.last_updated.as_deref())));
    let dynamic_listeners = dump.dynamic_listeners.iter().filter_map(|entry| {
        let state = entry.active_state.as_ref()?;
        Some((state.listener.as_ref()?, state.last_updated.as_deref()))
    });

    static_listeners
        .chain(dynamic_listeners)
        .map(|(config, last_updated)| normalize(config, last_updated.unwrap_or_default()))
        .collect()
}

fn normalize(config: &ListenerConfig, last_updated: &str) -> Result<Listener> {
    let raw_name = config.name.as_deref().unwrap_or_default();
    let (name, address) = match split_listener_name(raw_name) {
        (name, Some(address)) => (name, address.to_string()),
        (name, None) => (
            name,
            config.address.as_ref().and_then(|address| address.display()).unwrap_or_default(),
        ),
    };

    let direction = TrafficDirection::from_envoy(config.traffic_direction.as_deref());

    let filter_chain = config
        .filter_chains
        .iter()
        .chain(config.default_filter_chain.as_ref())
        .map(|chain| summarize_chain(chain, direction))
        .collect::<Result<Vec<_>>>()?;

    Ok(Listener {
        name: name.to_string(),
        address,
        direction,
        filter_chain,
        last_updated: last_updated.to_string(),
    })
}

fn summarize_chain(chain: &FilterChainConfig, direction: TrafficDirection) -> Result<FilterChain> {
    let filter_chain_match = if direction.walks_outbound() {
        chain
            .filter_chain_match
            .as_ref()
            .map(|chain_match| {
                chain_match
                    .prefix_ranges
                    .iter()
                    .filter_map(|range| range.address_prefix.as_deref())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default()
    } else {
        String::new()
    };

    let mut filters = Vec::new();
    for filter in &chain.filters {
        match filter.kind() {
            NetworkFilterKind::Rbac if direction.walks_inbound() => {
                if let Some(rbac) = decode_filter::<RbacFilter>(filter)? {
                    filters.extend(rbac_rule(&rbac));
                }
            }
            NetworkFilterKind::TcpProxy => {
                if let Some(proxy) = decode_filter::<TcpProxy>(filter)? {
                    filters.extend(tcp_proxy_destinations(&proxy));
                }
            }
            NetworkFilterKind::HttpConnectionManager => {
                if let Some(hcm) = decode_filter::<HttpConnectionManager>(filter)? {
                    if direction.walks_inbound() {
                        filters.extend(http_rbac_rules(&hcm)?);
                    }
                    filters.extend(http_destinations(&hcm));
                }
            }
            _ => {}
        }
    }

    Ok(FilterChain { filter_chain_match, filters })
}

fn decode_filter<T: serde::de::DeserializeOwned>(filter: &NetworkFilter) -> Result<Option<T>> {
    filter.decode().map_err(|e| malformed_filter(filter.name.as_deref(), e))
}

fn malformed_filter(name: Option<&str>, error: serde_json::Error) -> InspectError {
    InspectError::malformed_section(
        ResourceKind::Listeners,
        format!("filter '{}': {}", name.unwrap_or_default(), error),
    )
}

/// Rules of every HTTP RBAC filter of the connection manager, in filter order
fn http_rbac_rules(hcm: &HttpConnectionManager) -> Result<Vec<String>> {
    let mut rules = Vec::new();
    for filter in hcm.http_filters.iter().filter(|filter| filter.is_rbac()) {
        let rbac: Option<RbacFilter> =
            filter.decode().map_err(|e| malformed_filter(filter.name.as_deref(), e))?;
        rules.extend(rbac.as_ref().and_then(rbac_rule));
    }
    Ok(rules)
}

/// `ALLOW spiffe://a,spiffe://b`; `None` when the filter carries no rules
fn rbac_rule(rbac: &RbacFilter) -> Option<String> {
    let rules = rbac.rules.as_ref()?;
    let action = rules.action.as_deref().unwrap_or(DEFAULT_RBAC_ACTION);

    let mut patterns = Vec::new();
    for policy in rules.policies.values() {
        for principal in &policy.principals {
            principal.collect_patterns(&mut patterns);
        }
    }

    if patterns.is_empty() {
        Some(action.to_string())
    } else {
        Some(format!("{} {}", action, patterns.join(",")))
    }
}

fn tcp_proxy_destinations(proxy: &TcpProxy) -> Vec<String> {
    let weighted = proxy
        .weighted_clusters
        .iter()
        .flat_map(|weighted| weighted.clusters.iter())
        .filter_map(|cluster| cluster.name.as_deref());

    proxy.cluster.as_deref().into_iter().chain(weighted).map(|name| format!("-> {}", name)).collect()
}

fn http_destinations(hcm: &HttpConnectionManager) -> Vec<String> {
    let mut destinations: Vec<String> = hcm
        .route_config
        .iter()
        .flat_map(|config| config.routes())
        .filter_map(|route| route.cluster())
        .map(|cluster| format!("-> {}", cluster))
        .collect();

    if let Some(name) = hcm.rds.as_ref().and_then(|rds| rds.route_config_name.as_deref()) {
        destinations.push(format!("-> rds:{}", name));
    }

    destinations
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rbac_filter(action: Option<&str>, principals: Value) -> Value {
        let mut rules = json!({"policies": {"consul-intentions-layer4": {"principals": principals}}});
        if let Some(action) = action {
            rules["action"] = json!(action);
        }
        json!({
            "name": "envoy.filters.network.rbac",
            "typed_config": {
                "@type": "type.googleapis.com/envoy.extensions.filters.network.rbac.v3.RBAC",
                "rules": rules,
                "stat_prefix": "connect_authz"
            }
        })
    }

    fn tcp_proxy(cluster: &str) -> Value {
        json!({
            "name": "envoy.filters.network.tcp_proxy",
            "typed_config": {
                "@type": "type.googleapis.com/envoy.extensions.filters.network.tcp_proxy.v3.TcpProxy",
                "stat_prefix": "tcp",
                "cluster": cluster
            }
        })
    }

    fn inbound_listener() -> Value {
        json!({
            "name": "public_listener:10.0.0.1:20000",
            "address": {"socket_address": {"address": "10.0.0.1", "port_value": 20000}},
            "traffic_direction": "INBOUND",
            "filter_chains": [{
                "filter_chain_match": {"prefix_ranges": [{"address_prefix": "10.0.0.0", "prefix_len": 8}]},
                "filters": [
                    rbac_filter(Some("DENY"), json!([
                        {"authenticated": {"principal_name": {"safe_regex": {"regex": "^spiffe://.*/svc/billing$"}}}}
                    ])),
                    tcp_proxy("local_app")
                ]
            }]
        })
    }

    #[test]
    fn test_missing_section_is_empty() {
        assert!(extract(None).unwrap().is_empty());
    }

    #[test]
    fn test_inbound_listener() {
        let section = json!({
            "dynamic_listeners": [{
                "name": "public_listener:10.0.0.1:20000",
                "active_state": {"listener": inbound_listener(), "last_updated": "2024-03-01T10:00:00Z"}
            }]
        });

        let listeners = extract(Some(&section)).unwrap();
        assert_eq!(listeners.len(), 1);

        let listener = &listeners[0];
        assert_eq!(listener.name, "public_listener");
        assert_eq!(listener.address, "10.0.0.1:20000");
        assert_eq!(listener.direction, TrafficDirection::Inbound);
        assert_eq!(listener.last_updated, "2024-03-01T10:00:00Z");

        let chain = &listener.filter_chain[0];
        assert_eq!(chain.filter_chain_match, "", "inbound chains do not report prefixes");
        assert_eq!(chain.filters, vec!["DENY ^spiffe://.*/svc/billing$", "-> local_app"]);
    }

    #[test]
    fn test_outbound_listener() {
        let section = json!({
            "static_listeners": [{
                "listener": {
                    "name": "outbound_listener:127.0.0.1:15001",
                    "traffic_direction": "OUTBOUND",
                    "filter_chains": [
                        {
                            "filter_chain_match": {"prefix_ranges": [
                                {"address_prefix": "10.0.0.5", "prefix_len": 32},
                                {"address_prefix": "10.0.0.6", "prefix_len": 32}
                            ]},
                            "filters": [{
                                "name": "envoy.filters.network.http_connection_manager",
                                "typed_config": {
                                    "@type": "type.googleapis.com/envoy.extensions.filters.network.http_connection_manager.v3.HttpConnectionManager",
                                    "route_config": {"virtual_hosts": [{"routes": [
                                        {"match": {"prefix": "/"}, "route": {"cluster": "api"}},
                                        {"match": {"prefix": "/v2"}, "route": {"weighted_clusters": {"clusters": [
                                            {"name": "api-v2", "weight": 90}, {"name": "api-canary", "weight": 10}
                                        ]}}}
                                    ]}]}
                                }
                            }]
                        },
                        {
                            "filters": [rbac_filter(None, json!([{"any": true}])), tcp_proxy("db")]
                        }
                    ]
                },
                "last_updated": "2024-03-01T10:00:00Z"
            }]
        });

        let listeners = extract(Some(&section)).unwrap();
        let listener = &listeners[0];
        assert_eq!(listener.name, "outbound_listener");
        assert_eq!(listener.direction, TrafficDirection::Outbound);
        assert_eq!(listener.filter_chain.len(), 2);

        assert_eq!(listener.filter_chain[0].filter_chain_match, "10.0.0.5, 10.0.0.6");
        assert_eq!(listener.filter_chain[0].filters, vec!["-> api", "-> api-v2,api-canary"]);

        // RBAC rules are only summarized for inbound traffic
        assert_eq!(listener.filter_chain[1].filters, vec!["-> db"]);
    }

    #[test]
    fn test_unspecified_direction_walks_both() {
        let section = json!({
            "static_listeners": [{
                "listener": {
                    "name": "combined",
                    "address": {"socket_address": {"address": "0.0.0.0", "port_value": 8443}},
                    "filter_chains": [{
                        "filter_chain_match": {"prefix_ranges": [{"address_prefix": "192.168.0.0"}]},
                        "filters": [rbac_filter(None, json!([
                            {"or_ids": {"ids": [
                                {"authenticated": {"principal_name": {"exact": "spiffe://a"}}},
                                {"authenticated": {"principal_name": {"prefix": "spiffe://b"}}}
                            ]}},
                            {"not_id": {"authenticated": {"principal_name": {"exact": "spiffe://c"}}}}
                        ]))]
                    }]
                }
            }]
        });

        let listeners = extract(Some(&section)).unwrap();
        let listener = &listeners[0];
        assert_eq!(listener.name, "combined");
        assert_eq!(listener.address, "0.0.0.0:8443");
        assert_eq!(listener.direction, TrafficDirection::Unspecified);
        assert_eq!(listener.filter_chain[0].filter_chain_match, "192.168.0.0");
        assert_eq!(listener.filter_chain[0].filters, vec!["ALLOW spiffe://a,spiffe://b,!spiffe://c"]);
    }

    #[test]
    fn test_rds_and_default_filter_chain() {
        let section = json!({
            "static_listeners": [{
                "listener": {
                    "name": "http:0.0.0.0:8080",
                    "traffic_direction": "INBOUND",
                    "filter_chains": [],
                    "default_filter_chain": {
                        "filters": [{
                            "name": "envoy.filters.network.http_connection_manager",
                            "typed_config": {"rds": {"route_config_name": "web-routes"}}
                        }]
                    }
                }
            }]
        });

        let listeners = extract(Some(&section)).unwrap();
        assert_eq!(listeners[0].filter_chain.len(), 1);
        assert_eq!(listeners[0].filter_chain[0].filters, vec!["-> rds:web-routes"]);
    }

    fn http_listener(direction: &str, http_rbac_typed_config: Value) -> Value {
        json!({
            "name": "public_listener:10.0.0.1:20000",
            "traffic_direction": direction,
            "filter_chains": [{
                "filters": [{
                    "name": "envoy.filters.network.http_connection_manager",
                    "typed_config": {
                        "@type": "type.googleapis.com/envoy.extensions.filters.network.http_connection_manager.v3.HttpConnectionManager",
                        "http_filters": [
                            {"name": "envoy.filters.http.rbac", "typed_config": http_rbac_typed_config},
                            {"name": "envoy.filters.http.router"}
                        ],
                        "route_config": {"virtual_hosts": [{"routes": [
                            {"match": {"prefix": "/"}, "route": {"cluster": "local_app"}}
                        ]}]}
                    }
                }]
            }]
        })
    }

    fn http_rbac_deny_legacy() -> Value {
        json!({
            "@type": "type.googleapis.com/envoy.extensions.filters.http.rbac.v3.RBAC",
            "rules": {
                "action": "DENY",
                "policies": {"consul-intentions-layer7-0": {"principals": [
                    {"authenticated": {"principal_name": {"exact": "spiffe://dc1/svc/legacy"}}}
                ]}}
            }
        })
    }

    #[test]
    fn test_inbound_http_rbac_rules() {
        let section = json!({"static_listeners": [{"listener": http_listener("INBOUND", http_rbac_deny_legacy())}]});

        let listeners = extract(Some(&section)).unwrap();
        assert_eq!(
            listeners[0].filter_chain[0].filters,
            vec!["DENY spiffe://dc1/svc/legacy", "-> local_app"]
        );
    }

    #[test]
    fn test_outbound_skips_http_rbac_rules() {
        let section = json!({"static_listeners": [{"listener": http_listener("OUTBOUND", http_rbac_deny_legacy())}]});

        let listeners = extract(Some(&section)).unwrap();
        assert_eq!(listeners[0].filter_chain[0].filters, vec!["-> local_app"]);
    }

    #[test]
    fn test_malformed_http_rbac_filter() {
        let section = json!({"static_listeners": [{"listener": http_listener("INBOUND", json!({"rules": "deny-all"}))}]});

        let error = extract(Some(&section)).unwrap_err();
        assert!(matches!(error, InspectError::MalformedSection { kind: ResourceKind::Listeners, .. }));
        assert!(error.to_string().contains("envoy.filters.http.rbac"));
    }

    #[test]
    fn test_dynamic_without_active_state_is_skipped() {
        let section = json!({
            "dynamic_listeners": [
                {"name": "warming_only", "warming_state": {"listener": {"name": "warming_only"}}},
                {"name": "ok", "active_state": {"listener": {"name": "ok"}}}
            ]
        });

        let listeners = extract(Some(&section)).unwrap();
        assert_eq!(listeners.len(), 1);
        assert_eq!(listeners[0].name, "ok");
        assert_eq!(listeners[0].address, "");
        assert!(listeners[0].filter_chain.is_empty());
    }

    #[test]
    fn test_unknown_filters_are_ignored() {
        let section = json!({
            "static_listeners": [{
                "listener": {
                    "name": "l",
                    "traffic_direction": "INBOUND",
                    "filter_chains": [{"filters": [
                        {"name": "envoy.filters.network.sni_cluster"},
                        {"name": "envoy.filters.network.tcp_proxy"}
                    ]}]
                }
            }]
        });

        let listeners = extract(Some(&section)).unwrap();
        assert!(listeners[0].filter_chain[0].filters.is_empty());
    }

    #[test]
    fn test_malformed_filter_config() {
        let section = json!({
            "static_listeners": [{
                "listener": {
                    "name": "l",
                    "traffic_direction": "INBOUND",
                    "filter_chains": [{"filters": [
                        {"name": "envoy.filters.network.tcp_proxy", "typed_config": {"cluster": ["not", "a", "string"]}}
                    ]}]
                }
            }]
        });

        let error = extract(Some(&section)).unwrap_err();
        assert!(matches!(error, InspectError::MalformedSection { kind: ResourceKind::Listeners, .. }));
        assert!(error.to_string().contains("envoy.filters.network.tcp_proxy"));
    }
}
