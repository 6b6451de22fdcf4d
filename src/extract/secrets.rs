//! Secret extraction
//!
//! Envoy redacts key material from the dump but keeps certificate chains and trusted
//! CAs. When one is inlined, the validity window of its first certificate is reported.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::debug;
use x509_parser::prelude::*;

use super::decode_section;
use crate::config_dump::schema::{DataSource, SecretConfig, SecretEntry, SecretsConfigDump};
use crate::domain::{ResourceKind, Secret};
use crate::errors::Result;

const STATUS_STATIC: &str = "STATIC";
const STATUS_ACTIVE: &str = "ACTIVE";
const STATUS_WARMING: &str = "WARMING";

/// Extract secrets from a `SecretsConfigDump` block, checking validity against now.
pub fn extract(section: Option<&Value>) -> Result<Vec<Secret>> {
    extract_at(section, Utc::now())
}

/// Extract secrets, judging certificate validity at the given instant.
///
/// Static secrets come first, then dynamic active and dynamic warming ones.
pub fn extract_at(section: Option<&Value>, now: DateTime<Utc>) -> Result<Vec<Secret>> {
    let dump: SecretsConfigDump = decode_section(ResourceKind::Secrets, section)?;

    let tagged = dump
        .static_secrets
        .iter()
        .map(|entry| (entry, STATUS_STATIC))
        .chain(dump.dynamic_active_secrets.iter().map(|entry| (entry, STATUS_ACTIVE)))
        .chain(dump.dynamic_warming_secrets.iter().map(|entry| (entry, STATUS_WARMING)));

    Ok(tagged.map(|(entry, status)| normalize(entry, status, now)).collect())
}

fn normalize(entry: &SecretEntry, status: &str, now: DateTime<Utc>) -> Secret {
    let body = entry.secret.as_ref();
    let name = entry.name.clone().or_else(|| body.and_then(|secret| secret.name.clone()));

    let mut secret = Secret {
        name: name.unwrap_or_default(),
        secret_type: body.map(secret_type).unwrap_or_default().to_string(),
        status: status.to_string(),
        last_updated: entry.last_updated.clone().unwrap_or_default(),
        ..Default::default()
    };

    if let Some(window) = body.and_then(certificate_source).and_then(read_validity) {
        secret.valid = window.is_valid_at(now).to_string();
        secret.valid_from = window.not_before.to_rfc3339_opts(SecondsFormat::Secs, true);
        secret.valid_to = window.not_after.to_rfc3339_opts(SecondsFormat::Secs, true);
    }

    secret
}

fn secret_type(secret: &SecretConfig) -> &'static str {
    if secret.tls_certificate.is_some() {
        "TLS Certificate"
    } else if secret.validation_context.is_some() {
        "Certificate Authority"
    } else if secret.session_ticket_keys.is_some() {
        "Session Ticket Keys"
    } else if secret.generic_secret.is_some() {
        "Generic"
    } else {
        ""
    }
}

fn certificate_source(secret: &SecretConfig) -> Option<&DataSource> {
    secret
        .tls_certificate
        .as_ref()
        .and_then(|tls| tls.certificate_chain.as_ref())
        .or_else(|| secret.validation_context.as_ref().and_then(|ctx| ctx.trusted_ca.as_ref()))
}

/// Validity window of a certificate
struct ValidityWindow {
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
}

impl ValidityWindow {
    fn is_valid_at(&self, instant: DateTime<Utc>) -> bool {
        self.not_before <= instant && instant <= self.not_after
    }
}

/// Read the first certificate of an inline data source; file references are not followed.
fn read_validity(source: &DataSource) -> Option<ValidityWindow> {
    let bytes = match (&source.inline_string, &source.inline_bytes) {
        (Some(text), _) => text.as_bytes().to_vec(),
        (None, Some(encoded)) => match STANDARD.decode(encoded.trim()) {
            Ok(decoded) => decoded,
            Err(e) => {
                debug!(error = %e, "Secret inline_bytes is not valid base64");
                return None;
            }
        },
        (None, None) => return None,
    };

    let parsed = if String::from_utf8_lossy(&bytes).trim_start().starts_with("-----BEGIN") {
        parse_pem_validity(&bytes)
    } else {
        X509Certificate::from_der(&bytes)
            .map(|(_, cert)| window_of(&cert))
            .map_err(|e| e.to_string())
    };

    match parsed {
        Ok(window) => window,
        Err(e) => {
            debug!(error = %e, "Could not parse inline certificate");
            None
        }
    }
}

fn parse_pem_validity(bytes: &[u8]) -> std::result::Result<Option<ValidityWindow>, String> {
    let (_, pem) = x509_parser::pem::parse_x509_pem(bytes).map_err(|e| e.to_string())?;
    let cert = pem.parse_x509().map_err(|e| e.to_string())?;
    Ok(window_of(&cert))
}

fn window_of(cert: &X509Certificate<'_>) -> Option<ValidityWindow> {
    let validity = cert.validity();
    Some(ValidityWindow {
        not_before: DateTime::from_timestamp(validity.not_before.timestamp(), 0)?,
        not_after: DateTime::from_timestamp(validity.not_after.timestamp(), 0)?,
    })
}
