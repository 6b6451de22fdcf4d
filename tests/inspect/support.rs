//! Support utilities for inspection integration tests

use bytes::Bytes;
use envoy_inspect::{build_view, ConfigView, FilterParams, InspectOptions, KindSelection, OutputMode};
use std::path::PathBuf;

/// Path of the recorded config dump fixture
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/config_dump.json")
}

/// Raw bytes of the recorded config dump
pub fn fixture_bytes() -> Bytes {
    Bytes::from(std::fs::read(fixture_path()).expect("read config dump fixture"))
}

/// Options for one invocation without color or title
pub fn options(mode: OutputMode, filters: FilterParams, selection: KindSelection) -> InspectOptions {
    InspectOptions { mode, filters, selection, color: false, title: None }
}

/// Build the filtered view of the fixture
pub fn fixture_view(filters: FilterParams, selection: KindSelection) -> ConfigView {
    build_view(&fixture_bytes(), &options(OutputMode::Table, filters, selection))
        .expect("fixture builds a view")
}
