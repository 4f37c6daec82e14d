// SPDX-License-Identifier: MIT OR Apache-2.0

//! etcd remote KV client.

use crate::adapters::runtime::block_on;
use crate::domain::{ConfigError, ResolverSettings, Result};
use crate::ports::RemoteKvClient;
use etcd_client::Client;

/// Default etcd client port appended when the configured host has none.
const DEFAULT_PORT: u16 = 2379;

/// Blocking [`RemoteKvClient`] over an etcd cluster.
///
/// Keys are looked up as `prefix + key`.
///
/// # Examples
///
/// ```rust,no_run
/// use layercfg::adapters::{EtcdKvClient, TimedCacheConfigSource};
/// use layercfg::domain::ResolverSettings;
/// use std::sync::Arc;
///
/// # fn main() -> layercfg::domain::Result<()> {
/// let settings = ResolverSettings::from_env()?;
/// let client = EtcdKvClient::from_settings(&settings, Some("myapp/"))?;
/// let source = TimedCacheConfigSource::from_settings(Arc::new(client), &settings);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EtcdKvClient {
    client: Client,
    endpoints: String,
    prefix: String,
}

impl EtcdKvClient {
    /// Connects to the given endpoints (e.g. `["localhost:2379"]`).
    pub fn connect<S: AsRef<str>>(endpoints: &[S], prefix: Option<&str>) -> Result<Self> {
        let endpoints: Vec<String> = endpoints.iter().map(|s| s.as_ref().to_string()).collect();
        let joined = endpoints.join(",");

        let endpoint = joined.clone();
        let client = block_on("etcd", async move { Client::connect(&endpoints, None).await })?
            .map_err(|e| ConfigError::RemoteTransportError {
                endpoint,
                message: format!("Failed to connect to etcd: {}", e),
                source: Some(Box::new(e)),
            })?;

        tracing::info!(endpoints = %joined, prefix = ?prefix, "Connected to etcd");

        Ok(Self {
            client,
            endpoints: joined,
            prefix: prefix.unwrap_or_default().to_string(),
        })
    }

    /// Connects to `remote.host` from `settings`.
    pub fn from_settings(settings: &ResolverSettings, prefix: Option<&str>) -> Result<Self> {
        Self::connect(&[etcd_endpoint(&settings.remote_host)], prefix)
    }
}

impl RemoteKvClient for EtcdKvClient {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut client = self.client.clone();
        let full_key = format!("{}{}", self.prefix, key);

        let response = block_on("etcd", async move { client.get(full_key, None).await })?
            .map_err(|e| ConfigError::RemoteTransportError {
                endpoint: self.endpoints.clone(),
                message: format!("Failed to fetch key from etcd: {}", e),
                source: Some(Box::new(e)),
            })?;

        let Some(kv) = response.kvs().first() else {
            return Ok(None);
        };
        kv.value_str()
            .map(|v| Some(v.to_string()))
            .map_err(|e| ConfigError::RemoteTransportError {
                endpoint: self.endpoints.clone(),
                message: format!("etcd value for '{}' is not UTF-8", key),
                source: Some(Box::new(e)),
            })
    }

    fn endpoint(&self) -> &str {
        &self.endpoints
    }
}

impl std::fmt::Debug for EtcdKvClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EtcdKvClient")
            .field("endpoints", &self.endpoints)
            .field("prefix", &self.prefix)
            .finish()
    }
}

/// Turns `remote.host` into an etcd endpoint.
fn etcd_endpoint(host: &str) -> String {
    if host.contains(':') {
        host.to_string()
    } else {
        format!("{}:{}", host, DEFAULT_PORT)
    }
}
