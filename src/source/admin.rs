//! Envoy admin API source

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

use super::{ConfigSource, FetchError};

/// Admin API client configuration
#[derive(Debug, Clone)]
pub struct AdminApiConfig {
    /// Base URL of the admin listener (e.g., "http://localhost:19000")
    pub admin_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// Connect timeout
    pub connect_timeout: Duration,
}

impl Default for AdminApiConfig {
    fn default() -> Self {
        Self {
            admin_url: "http://localhost:19000".to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// Fetches `/config_dump?include_eds` from a reachable admin listener
#[derive(Debug, Clone)]
pub struct AdminApiSource {
    client: Client,
    url: Url,
}

impl AdminApiSource {
    pub fn new(config: AdminApiConfig) -> Result<Self, FetchError> {
        let url = config_dump_url(&config.admin_url)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client, url })
    }

    /// Full URL the dump is requested from
    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Resolve `<admin_url>/config_dump?include_eds`, keeping any path prefix of the base.
fn config_dump_url(admin_url: &str) -> Result<Url, FetchError> {
    let invalid = |message: String| FetchError::InvalidUrl { url: admin_url.to_string(), message };

    let mut base = Url::parse(admin_url.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    let mut url = base.join("config_dump").map_err(|e| invalid(e.to_string()))?;
    url.set_query(Some("include_eds"));
    Ok(url)
}

#[async_trait]
impl ConfigSource for AdminApiSource {
    async fn fetch_raw_config(&self) -> Result<Bytes, FetchError> {
        debug!(url = %self.url, "GET config dump");

        let response = self.client.get(self.url.clone()).send().await.map_err(|source| {
            FetchError::Transport { url: self.url.to_string(), source }
        })?;

        let status = response.status();
        debug!(status = %status, "Response status");

        if !status.is_success() {
            let body =
                response.text().await.unwrap_or_else(|_| "<unable to read error>".to_string());
            trace!("Error response:\n{}", body);
            return Err(FetchError::Status { status: status.as_u16(), body });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport { url: self.url.to_string(), source })?;
        debug!(bytes = body.len(), "Fetched config dump");
        Ok(body)
    }

    fn describe(&self) -> String {
        let mut origin = self.url.clone();
        origin.set_query(None);
        let path = origin.path().trim_end_matches("config_dump").to_string();
        origin.set_path(&path);
        origin.as_str().trim_end_matches('/').to_string()
    }
}
