//! # Envoy Config Dump
//!
//! Loading of the admin `/config_dump` document and the typed schema its sections
//! decode into.

pub mod document;
pub mod schema;

pub use document::{Document, SectionKind};
