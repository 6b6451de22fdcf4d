//! Cluster Endpoint Domain Types
//!
//! Individual load-balancing endpoints aggregated across every cluster load
//! assignment in the endpoints section.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single upstream host the proxy may send traffic to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// `address:port`, empty when the endpoint carries no socket address
    pub address: String,

    /// Owning cluster name, empty when the load assignment does not name one
    pub cluster: String,

    pub weight: f64,

    /// Health status as reported by the proxy (`HEALTHY`, `UNHEALTHY`, ...)
    pub status: String,
}

impl Endpoint {
    /// Port parsed from the trailing `:port` of the address
    pub fn port(&self) -> Option<u16> {
        self.address.rsplit_once(':').and_then(|(_, port)| port.parse().ok())
    }

    /// Classified health status
    pub fn health(&self) -> HealthStatus {
        HealthStatus::from_envoy(&self.status)
    }
}

/// Health status of an endpoint, classified from Envoy's `health_status` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Endpoint is healthy
    Healthy,

    /// Endpoint is unhealthy, draining, timing out or degraded
    Unhealthy,

    /// Status missing or `UNKNOWN`
    Unknown,
}

impl HealthStatus {
    /// Classify a raw Envoy health status string
    pub fn from_envoy(status: &str) -> Self {
        match status {
            "HEALTHY" => HealthStatus::Healthy,
            "UNHEALTHY" | "DRAINING" | "TIMEOUT" | "DEGRADED" => HealthStatus::Unhealthy,
            _ => HealthStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Unhealthy => "unhealthy",
            HealthStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
