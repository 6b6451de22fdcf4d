//! Integration tests for config dump sources
//!
//! Tests:
//! - File source end to end
//! - Admin API source against a mock admin listener
//! - Fetch failures surface as fetch errors

use super::support::{fixture_bytes, fixture_path, options};
use envoy_inspect::{
    inspect_source, AdminApiConfig, AdminApiSource, FetchError, FileSource, FilterParams,
    InspectError, KindSelection, OutputMode,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn admin_source(server: &MockServer) -> AdminApiSource {
    AdminApiSource::new(AdminApiConfig { admin_url: server.uri(), ..Default::default() })
        .expect("valid admin url")
}

#[tokio::test]
async fn test_file_source_end_to_end() {
    let source = FileSource::new(fixture_path());
    let selection = KindSelection { endpoints: true, ..Default::default() };

    let output =
        inspect_source(&source, &options(OutputMode::Json, FilterParams::default(), selection))
            .await
            .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["endpoints"].as_array().unwrap().len(), 5);
    assert_eq!(value["endpoints"][2]["status"], "UNHEALTHY");
}

#[tokio::test]
async fn test_admin_source_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config_dump"))
        .and(query_param("include_eds", ""))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(fixture_bytes().to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let source = admin_source(&server);
    let filters = FilterParams::from_flags("web.default.dc1.internal", "10.0.0", -1);
    let selection = KindSelection { clusters: true, ..Default::default() };

    let output = inspect_source(&source, &options(OutputMode::Table, filters, selection))
        .await
        .unwrap();
    let table = String::from_utf8(output.to_vec()).unwrap();

    assert!(table.contains("Clusters (1)"));
    assert!(table.contains("web.default.dc1.internal.0f3a6b1e.consul"));
    assert!(!table.contains("10.1.0.7"));
}

#[tokio::test]
async fn test_admin_source_raw_passthrough() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config_dump"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(fixture_bytes().to_vec()))
        .mount(&server)
        .await;

    let output = inspect_source(
        &admin_source(&server),
        &options(OutputMode::Raw, FilterParams::default(), KindSelection::default()),
    )
    .await
    .unwrap();
    assert_eq!(output, fixture_bytes());
}

#[tokio::test]
async fn test_admin_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config_dump"))
        .respond_with(ResponseTemplate::new(503).set_body_string("no healthy upstream"))
        .mount(&server)
        .await;

    let error = inspect_source(
        &admin_source(&server),
        &options(OutputMode::Table, FilterParams::default(), KindSelection::default()),
    )
    .await
    .unwrap_err();

    assert!(matches!(error, InspectError::Fetch(FetchError::Status { status: 503, .. })));
    assert!(error.to_string().contains("no healthy upstream"));
}

#[tokio::test]
async fn test_missing_file() {
    let source = FileSource::new(fixture_path().with_file_name("missing.json"));
    let error = inspect_source(
        &source,
        &options(OutputMode::Raw, FilterParams::default(), KindSelection::default()),
    )
    .await
    .unwrap_err();

    assert!(matches!(error, InspectError::Fetch(FetchError::Io { .. })));
}
