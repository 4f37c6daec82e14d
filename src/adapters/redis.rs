// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redis remote KV client.

use crate::adapters::runtime::block_on;
use crate::domain::{ConfigError, ResolverSettings, Result};
use crate::ports::RemoteKvClient;
use redis::{AsyncCommands, Client};
use std::sync::Arc;

/// Default Redis port appended when the configured host has none.
const DEFAULT_PORT: u16 = 6379;

/// How configuration keys are laid out in Redis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedisStorageMode {
    /// One Redis string per key, named `namespace + key` (`myapp:db.host`).
    StringKeys,
    /// All keys as fields of the hash named `namespace`.
    Hash,
}

/// Blocking [`RemoteKvClient`] over Redis.
///
/// # Examples
///
/// ```rust,no_run
/// use layercfg::adapters::{RedisKvClient, RedisStorageMode, TimedCacheConfigSource};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let client = RedisKvClient::new("redis://localhost:6379", "myapp:", RedisStorageMode::StringKeys)
///     .unwrap();
/// let source = TimedCacheConfigSource::new(Arc::new(client), Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct RedisKvClient {
    client: Arc<Client>,
    url: String,
    namespace: String,
    storage_mode: RedisStorageMode,
}

impl RedisKvClient {
    /// Rejects namespaces containing Redis pattern characters.
    fn validate_namespace(namespace: &str) -> Result<()> {
        if namespace.contains(['*', '?', '[', ']', '\\']) {
            return Err(ConfigError::SourceError {
                source_name: "redis".to_string(),
                message: "Namespace contains invalid characters (* ? [ ] \\)".to_string(),
                source: None,
            });
        }
        Ok(())
    }

    /// Creates a client for `url`. No connection is made until the first lookup.
    pub fn new(url: &str, namespace: &str, storage_mode: RedisStorageMode) -> Result<Self> {
        Self::validate_namespace(namespace)?;

        let client = Client::open(url).map_err(|e| ConfigError::SourceError {
            source_name: "redis".to_string(),
            message: format!("Invalid Redis URL: {}", e),
            source: Some(Box::new(e)),
        })?;

        Ok(Self {
            client: Arc::new(client),
            url: url.to_string(),
            namespace: namespace.to_string(),
            storage_mode,
        })
    }

    /// Creates a client for `remote.host` from `settings`.
    pub fn from_settings(
        settings: &ResolverSettings,
        namespace: &str,
        storage_mode: RedisStorageMode,
    ) -> Result<Self> {
        Self::new(&redis_url(&settings.remote_host), namespace, storage_mode)
    }

    fn transport(&self, message: &str, e: redis::RedisError) -> ConfigError {
        ConfigError::RemoteTransportError {
            endpoint: self.url.clone(),
            message: format!("{}: {}", message, e),
            source: Some(Box::new(e)),
        }
    }
}

impl RemoteKvClient for RedisKvClient {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let this = self.clone();
        let key = key.to_string();

        block_on("redis", async move {
            let mut conn = this
                .client
                .get_multiplexed_async_connection()
                .await
                .map_err(|e| this.transport("Failed to connect to Redis", e))?;

            let value: Option<String> = match this.storage_mode {
                RedisStorageMode::StringKeys => conn
                    .get(format!("{}{}", this.namespace, key))
                    .await
                    .map_err(|e| this.transport("Failed to fetch value from Redis", e))?,
                RedisStorageMode::Hash => conn
                    .hget(&this.namespace, &key)
                    .await
                    .map_err(|e| this.transport("Failed to fetch hash field from Redis", e))?,
            };
            Ok::<Option<String>, ConfigError>(value)
        })?
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

/// Turns `remote.host` into a Redis URL.
fn redis_url(host: &str) -> String {
    if host.contains("://") {
        host.to_string()
    } else if host.contains(':') {
        format!("redis://{}", host)
    } else {
        format!("redis://{}:{}", host, DEFAULT_PORT)
    }
}
