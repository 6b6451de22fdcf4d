//! Integration tests for output modes and kind selection
//!
//! Tests:
//! - Raw output is the input, byte for byte
//! - JSON output keys follow the kind selection
//! - Table and JSON agree on counts
//! - Unknown output modes are rejected

use super::support::{fixture_bytes, options};
use envoy_inspect::{inspect, FilterParams, InspectError, KindSelection, OutputMode};

#[test]
fn test_raw_output_is_byte_identical() {
    let raw = fixture_bytes();
    let filters = FilterParams::from_flags("web", "10.0.0", 20000);
    let selection = KindSelection { secrets: true, ..Default::default() };

    let output = inspect(&raw, &options(OutputMode::Raw, filters, selection)).unwrap();
    assert_eq!(output, raw);
}

#[test]
fn test_raw_output_skips_parsing() {
    let raw = bytes::Bytes::from_static(b"definitely not json");
    let output =
        inspect(&raw, &options(OutputMode::Raw, FilterParams::default(), KindSelection::default()))
            .unwrap();
    assert_eq!(output, raw);
}

#[test]
fn test_json_follows_selection() {
    let selection = KindSelection { clusters: true, routes: true, ..Default::default() };
    let output =
        inspect(&fixture_bytes(), &options(OutputMode::Json, FilterParams::default(), selection))
            .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 2);
    assert!(keys.contains(&"clusters"));
    assert!(keys.contains(&"routes"));
    assert_eq!(value["clusters"][1]["type"], "STATIC");
    assert_eq!(value["routes"][0]["name"], "web");
}

#[test]
fn test_table_and_json_agree() {
    let filters = FilterParams::from_flags("", "10.0.0", -1);
    let raw = fixture_bytes();

    let json = inspect(&raw, &options(OutputMode::Json, filters.clone(), KindSelection::default()))
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&json).unwrap();

    let table = inspect(&raw, &options(OutputMode::Table, filters, KindSelection::default())).unwrap();
    let table = String::from_utf8(table.to_vec()).unwrap();

    for (key, title) in [
        ("clusters", "Clusters"),
        ("endpoints", "Endpoints"),
        ("listeners", "Listeners"),
        ("routes", "Routes"),
        ("secrets", "Secrets"),
    ] {
        let count = value[key].as_array().unwrap().len();
        assert!(
            table.contains(&format!("{} ({})", title, count)),
            "table heading for {} should report {} rows",
            key,
            count
        );
    }
    assert!(table.contains("Endpoint addresses must contain `10.0.0`"));
}

#[test]
fn test_table_lists_inbound_rbac() {
    let selection = KindSelection { listeners: true, ..Default::default() };
    let output =
        inspect(&fixture_bytes(), &options(OutputMode::Table, FilterParams::default(), selection))
            .unwrap();
    let table = String::from_utf8(output.to_vec()).unwrap();

    assert!(table.starts_with("Listeners (2)"));
    assert!(table.contains("DENY ^spiffe://"));
    assert!(table.contains("-> local_app"));
    assert!(!table.contains("Clusters"));
}

#[test]
fn test_unknown_output_mode() {
    let error = "yaml".parse::<OutputMode>().unwrap_err();
    assert!(matches!(error, InspectError::UnknownOutputMode { ref mode } if mode == "yaml"));
    assert_eq!(" JSON ".parse::<OutputMode>().unwrap(), OutputMode::Json);
}

#[test]
fn test_malformed_document() {
    let raw = bytes::Bytes::from_static(b"{\"configs\": {}}");
    let error =
        inspect(&raw, &options(OutputMode::Json, FilterParams::default(), KindSelection::default()))
            .unwrap_err();
    assert!(matches!(error, InspectError::MalformedDocument { .. }));
}

#[test]
fn test_out_of_range_port_fails() {
    for port in [70000, -5] {
        let filters = FilterParams::from_flags("", "", port);
        let error =
            inspect(&fixture_bytes(), &options(OutputMode::Table, filters, KindSelection::default()))
                .unwrap_err();
        assert!(matches!(error, InspectError::UnsupportedFilterCombination { .. }));
    }
}
