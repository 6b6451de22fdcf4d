//! Integration tests for filtering the recorded config dump
//!
//! Tests:
//! - Unfiltered extraction
//! - FQDN and address filters combined
//! - Port filter on endpoints
//! - Filters leave routes and secrets untouched

use super::support::fixture_view;
use envoy_inspect::domain::TrafficDirection;
use envoy_inspect::{FilterParams, KindSelection};

#[test]
fn test_unfiltered_view() {
    let view = fixture_view(FilterParams::default(), KindSelection::default());

    let clusters = view.clusters.unwrap();
    assert_eq!(clusters.len(), 4);
    assert_eq!(clusters[0].name, "local_app");
    assert_eq!(clusters[1].name, "web");
    assert_eq!(clusters[1].endpoints, vec!["10.0.0.5:20000", "10.1.0.7:20000"]);
    assert_eq!(clusters[3].cluster_type, "EDS");
    assert!(clusters[3].endpoints.is_empty());

    let endpoints = view.endpoints.unwrap();
    assert_eq!(endpoints.len(), 5);
    assert_eq!(endpoints[0].cluster, "local_app");
    assert_eq!(endpoints[0].status, "");
    assert_eq!(endpoints[0].weight, 1.0);

    let listeners = view.listeners.unwrap();
    assert_eq!(listeners.len(), 2, "listener without an active state is skipped");
    assert_eq!(listeners[0].name, "public_listener");
    assert_eq!(listeners[0].address, "10.0.0.3:20000");
    assert_eq!(listeners[0].direction, TrafficDirection::Inbound);
    assert_eq!(
        listeners[0].filter_chain[0].filters,
        vec!["DENY ^spiffe://[^/]+/ns/default/dc/[^/]+/svc/legacy$", "-> local_app"]
    );
    assert_eq!(listeners[1].filter_chain[0].filter_chain_match, "10.4.0.0");

    let routes = view.routes.unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].destination_cluster, "web.default.dc1.internal.0f3a6b1e.consul/");

    let secrets = view.secrets.unwrap();
    assert_eq!(secrets.len(), 1);
    assert_eq!(secrets[0].secret_type, "Certificate Authority");
    assert_eq!(secrets[0].status, "STATIC");
    assert_eq!(secrets[0].valid, "");
}

#[test]
fn test_fqdn_and_address_filters() {
    let filters = FilterParams::from_flags("web.default.dc1.internal", "10.0.0", -1);
    let view = fixture_view(filters, KindSelection::default());

    let clusters = view.clusters.unwrap();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].fully_qualified_name, "web.default.dc1.internal.0f3a6b1e.consul");
    assert_eq!(clusters[0].endpoints, vec!["10.0.0.5:20000"]);

    let endpoint_addresses: Vec<String> =
        view.endpoints.unwrap().into_iter().map(|endpoint| endpoint.address).collect();
    assert_eq!(endpoint_addresses, vec!["10.0.0.5:20000", "10.0.0.9:20000", "10.0.0.9:21000"]);

    let listeners = view.listeners.unwrap();
    assert_eq!(listeners.len(), 1);
    assert_eq!(listeners[0].name, "public_listener");
}

#[test]
fn test_port_filter() {
    let filters = FilterParams::from_flags("", "", 21000);
    let view = fixture_view(filters, KindSelection::default());

    let endpoints = view.endpoints.unwrap();
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].status, "DRAINING");
    assert_eq!(endpoints[0].weight, 2.0);

    // clusters and listeners are not filtered by port
    assert_eq!(view.clusters.unwrap().len(), 4);
    assert_eq!(view.listeners.unwrap().len(), 2);
}

#[test]
fn test_filters_do_not_touch_routes_or_secrets() {
    let filters = FilterParams::from_flags("nothing-matches", "192.168.", 1);
    let view = fixture_view(filters, KindSelection::default());

    assert!(view.clusters.unwrap().is_empty());
    assert!(view.endpoints.unwrap().is_empty());
    assert!(view.listeners.unwrap().is_empty());
    assert_eq!(view.routes.unwrap().len(), 1);
    assert_eq!(view.secrets.unwrap().len(), 1);
}
