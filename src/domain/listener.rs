//! Listener domain types
//!
//! A listener is flattened into one entry per filter chain. Each chain keeps a
//! human-readable match summary plus one display string per interesting filter
//! (authorization rules, destination clusters).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A bound address and the filter chains applied to connections received there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listener {
    pub name: String,

    /// Bind address as `address:port`
    pub address: String,

    pub direction: TrafficDirection,

    pub filter_chain: Vec<FilterChain>,

    pub last_updated: String,
}

/// One filter chain of a listener.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterChain {
    /// Match criteria summary, e.g. the destination prefixes of an outbound chain
    pub filter_chain_match: String,

    /// Display strings such as `ALLOW spiffe://...` or `-> backend`
    pub filters: Vec<String>,
}

/// Traffic direction of a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrafficDirection {
    Inbound,
    Outbound,
    #[default]
    Unspecified,
}

impl TrafficDirection {
    /// Parse Envoy's `traffic_direction` field; anything unrecognized is unspecified
    pub fn from_envoy(direction: Option<&str>) -> Self {
        match direction {
            Some("INBOUND") => TrafficDirection::Inbound,
            Some("OUTBOUND") => TrafficDirection::Outbound,
            _ => TrafficDirection::Unspecified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficDirection::Inbound => "INBOUND",
            TrafficDirection::Outbound => "OUTBOUND",
            TrafficDirection::Unspecified => "UNSPECIFIED",
        }
    }

    /// Whether authorization rules are collected for this direction
    pub fn walks_inbound(&self) -> bool {
        matches!(self, TrafficDirection::Inbound | TrafficDirection::Unspecified)
    }

    /// Whether filter-chain match prefixes are collected for this direction
    pub fn walks_outbound(&self) -> bool {
        matches!(self, TrafficDirection::Outbound | TrafficDirection::Unspecified)
    }
}

impl fmt::Display for TrafficDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Split a combined `name:address:port` listener name on its first `:`.
///
/// Everything after the first `:` is returned verbatim as the address, so IPv6
/// addresses and `host:port` pairs survive intact. Returns `None` for the address
/// when the name contains no `:` at all.
pub fn split_listener_name(raw: &str) -> (&str, Option<&str>) {
    match raw.split_once(':') {
        Some((name, address)) => (name, Some(address)),
        None => (raw, None),
    }
}
