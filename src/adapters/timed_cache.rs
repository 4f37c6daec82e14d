// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote-KV-backed resolver with a time-boxed cache.
//!
//! Each lookup result, including "not found", is cached for a validity window.
//! A failing remote call is cached exactly like "not found" and never reaches
//! the caller: availability is preferred over reporting an outage. The two
//! outcomes are still told apart in logs and in [`CacheStats`].

use crate::domain::{ConfigKey, ConfigValue, ResolverSettings, Result};
use crate::ports::{ConfigSource, RemoteKvClient};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Name reported to the aggregator.
pub const NAME: &str = "ConsulConfigSource";

/// Ordinal reported to the aggregator; above the environment resolver.
pub const ORDINAL: i32 = 120;

#[derive(Clone, Debug)]
struct CacheRecord {
    value: Option<ConfigValue>,
    fetched_at: Instant,
}

impl CacheRecord {
    fn is_valid(&self, now: Instant, validity: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < validity
    }
}

/// Counters describing how lookups were answered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Served from a valid cache record.
    pub hits: u64,
    /// Fetched from the remote and a value was present.
    pub found: u64,
    /// Fetched from the remote and the key was confirmed absent.
    pub absent: u64,
    /// The remote call failed; cached as absent.
    pub failures: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    found: AtomicU64,
    absent: AtomicU64,
    failures: AtomicU64,
}

/// TTL read-through cache over a [`RemoteKvClient`].
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::TimedCacheConfigSource;
/// use layercfg::domain::Result;
/// use layercfg::ports::{ConfigSource, RemoteKvClient};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// struct Fixed;
///
/// impl RemoteKvClient for Fixed {
///     fn get(&self, key: &str) -> Result<Option<String>> {
///         Ok((key == "feature.enabled").then(|| "true".to_string()))
///     }
///
///     fn endpoint(&self) -> &str {
///         "fixed"
///     }
/// }
///
/// let source = TimedCacheConfigSource::new(Arc::new(Fixed), Duration::from_secs(10));
/// assert_eq!(source.get_str("feature.enabled").unwrap().unwrap().as_str(), "true");
/// assert!(source.get_str("feature.other").unwrap().is_none());
/// assert_eq!(source.stats().absent, 1);
/// ```
pub struct TimedCacheConfigSource {
    client: Arc<dyn RemoteKvClient>,
    validity: Duration,
    cache: DashMap<String, CacheRecord>,
    counters: Counters,
}

impl TimedCacheConfigSource {
    /// Creates a resolver whose records stay valid for `validity`.
    pub fn new(client: Arc<dyn RemoteKvClient>, validity: Duration) -> Self {
        tracing::info!(
            endpoint = %client.endpoint(),
            validity_ms = validity.as_millis() as u64,
            "Remote configuration source initialized"
        );

        Self {
            client,
            validity,
            cache: DashMap::new(),
            counters: Counters::default(),
        }
    }

    /// Creates a resolver using `remote.validitySeconds` from `settings`.
    pub fn from_settings(client: Arc<dyn RemoteKvClient>, settings: &ResolverSettings) -> Self {
        Self::new(client, settings.remote_validity)
    }

    /// The configured validity window.
    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Returns the value for `key`, contacting the remote only when the cached
    /// record is missing or expired.
    ///
    /// Never fails: a remote error is logged, cached as absent and reported as `None`.
    pub fn value(&self, key: &str) -> Option<ConfigValue> {
        if let Some(record) = self.cache.get(key) {
            if record.is_valid(Instant::now(), self.validity) {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                return record.value.clone();
            }
        }

        let value = self.fetch(key);
        // The window starts once the remote has answered.
        self.cache.insert(
            key.to_string(),
            CacheRecord {
                value: value.clone(),
                fetched_at: Instant::now(),
            },
        );
        value
    }

    /// Snapshot of every cached value, expired or not. Never contacts the remote.
    ///
    /// Negative records have no value and are left out.
    pub fn snapshot(&self) -> HashMap<String, ConfigValue> {
        self.cache
            .iter()
            .filter_map(|entry| {
                entry
                    .value()
                    .value
                    .clone()
                    .map(|value| (entry.key().clone(), value))
            })
            .collect()
    }

    /// Drops the cached record for `key`, forcing the next lookup to the remote.
    pub fn invalidate(&self, key: &str) {
        self.cache.remove(key);
    }

    /// Drops every cached record.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Returns the lookup counters accumulated so far.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            found: self.counters.found.load(Ordering::Relaxed),
            absent: self.counters.absent.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
        }
    }

    fn fetch(&self, key: &str) -> Option<ConfigValue> {
        match self.client.get(key) {
            Ok(Some(value)) => {
                self.counters.found.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key, outcome = "found", "Fetched remote configuration value");
                Some(ConfigValue::from(value))
            }
            Ok(None) => {
                self.counters.absent.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key, outcome = "absent", "Remote configuration key not found");
                None
            }
            Err(e) => {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    key,
                    outcome = "fetch_failed",
                    endpoint = %self.client.endpoint(),
                    error = %e,
                    "Remote configuration fetch failed; caching as absent"
                );
                None
            }
        }
    }
}

impl ConfigSource for TimedCacheConfigSource {
    fn name(&self) -> &str {
        NAME
    }

    fn ordinal(&self) -> i32 {
        ORDINAL
    }

    fn get_value(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        Ok(self.value(key.as_str()))
    }

    fn properties(&self) -> Result<HashMap<String, ConfigValue>> {
        Ok(self.snapshot())
    }
}

impl std::fmt::Debug for TimedCacheConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedCacheConfigSource")
            .field("endpoint", &self.client.endpoint())
            .field("validity", &self.validity)
            .field("cached", &self.cache.len())
            .finish()
    }
}
