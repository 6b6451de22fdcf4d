//! Secret domain types
//!
//! Envoy frequently omits everything but the secret name from its dump, so every
//! other field is a plain string that stays empty when the source has nothing.

use serde::{Deserialize, Serialize};

/// An SDS secret known to the proxy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    pub name: String,

    /// `TLS Certificate`, `Certificate Authority`, `Session Ticket Keys` or `Generic`
    #[serde(rename = "type")]
    pub secret_type: String,

    /// `STATIC`, `ACTIVE` or `WARMING`
    pub status: String,

    /// `true`/`false` when a certificate could be read, empty otherwise
    pub valid: String,

    pub valid_from: String,

    pub valid_to: String,

    pub last_updated: String,
}
