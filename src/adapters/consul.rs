// SPDX-License-Identifier: MIT OR Apache-2.0

//! Consul KV remote client.

use crate::adapters::runtime::block_on;
use crate::domain::{ConfigError, ResolverSettings, Result};
use crate::ports::RemoteKvClient;
use reqwest::StatusCode;
use std::time::Duration;

/// Default Consul HTTP API port appended when the configured host has none.
const DEFAULT_PORT: u16 = 8500;

/// Upper bound for a single KV request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Blocking [`RemoteKvClient`] over the Consul KV HTTP API.
///
/// Each lookup is a `GET /v1/kv/{prefix}{key}?raw`. A `404` means the key is
/// absent; any other non-success status or network problem is a
/// `RemoteTransportError`.
///
/// # Examples
///
/// ```rust,no_run
/// use layercfg::adapters::{ConsulKvClient, TimedCacheConfigSource};
/// use layercfg::domain::ResolverSettings;
/// use std::sync::Arc;
///
/// # fn main() -> layercfg::domain::Result<()> {
/// let settings = ResolverSettings::from_env()?;
/// let client = ConsulKvClient::from_settings(&settings, None)?;
/// let source = TimedCacheConfigSource::from_settings(Arc::new(client), &settings);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConsulKvClient {
    http: reqwest::Client,
    base_url: String,
    prefix: String,
}

impl ConsulKvClient {
    /// Creates a client for the agent at `base_url` (e.g. `http://localhost:8500`).
    ///
    /// No request is made until the first lookup.
    pub fn new(base_url: &str, prefix: Option<&str>) -> Result<Self> {
        let http = reqwest::ClientBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ConfigError::SourceError {
                source_name: "consul".to_string(),
                message: format!("Failed to build HTTP client: {}", e),
                source: Some(Box::new(e)),
            })?;

        let base_url = base_url.trim_end_matches('/').to_string();
        tracing::info!(endpoint = %base_url, prefix = ?prefix, "Created Consul KV client");

        Ok(Self {
            http,
            base_url,
            prefix: prefix.unwrap_or_default().to_string(),
        })
    }

    /// Creates a client for `remote.host` from `settings`.
    pub fn from_settings(settings: &ResolverSettings, prefix: Option<&str>) -> Result<Self> {
        Self::new(&consul_base_url(&settings.remote_host), prefix)
    }

    fn key_url(&self, key: &str) -> String {
        format!("{}/v1/kv/{}{}?raw", self.base_url, self.prefix, key)
    }
}

impl RemoteKvClient for ConsulKvClient {
    fn get(&self, key: &str) -> Result<Option<String>> {
        block_on(
            "consul",
            fetch_raw(self.http.clone(), self.key_url(key), self.base_url.clone()),
        )?
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}

async fn fetch_raw(http: reqwest::Client, url: String, endpoint: String) -> Result<Option<String>> {
    let transport = |message: &str, e: reqwest::Error| ConfigError::RemoteTransportError {
        endpoint: endpoint.clone(),
        message: format!("{}: {}", message, e),
        source: Some(Box::new(e)),
    };

    let response = http
        .get(&url)
        .send()
        .await
        .map_err(|e| transport("Failed to reach Consul", e))?;

    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }

    let body = response
        .error_for_status()
        .map_err(|e| transport("Consul rejected KV request", e))?
        .text()
        .await
        .map_err(|e| transport("Failed to read Consul response", e))?;

    Ok(Some(body))
}

/// Turns `remote.host` into a Consul HTTP API base URL.
fn consul_base_url(host: &str) -> String {
    if host.contains("://") {
        host.trim_end_matches('/').to_string()
    } else if host.contains(':') {
        format!("http://{}", host)
    } else {
        format!("http://{}:{}", host, DEFAULT_PORT)
    }
}
