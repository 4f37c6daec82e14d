// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database-backed resolver with a write-through cache.
//!
//! Values live in a `configuration(key, value)` table reached through a
//! [`KeyValueStore`]. Every value read from the store goes through one pass of
//! environment substitution before it is cached or returned. The cache has no
//! expiry: an entry only changes through `save_or_update`, a fresh store read,
//! or `delete_from_cache`.

use crate::domain::{
    ConfigError, ConfigKey, ConfigValue, EnvironmentSubstitutor, ResolverSettings, Result,
};
use crate::ports::{ConfigEntry, ConfigSource, KeyValueStore};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

/// Unqualified name of the configuration table.
pub const CONFIGURATION_TABLE: &str = "configuration";

/// Default ordinal: above the environment resolver, below the remote one.
pub const DEFAULT_ORDINAL: i32 = 110;

/// Returns the configuration table name, qualified with `schema` when set.
///
/// ```
/// use layercfg::adapters::backed::table_name;
///
/// assert_eq!(table_name(""), "configuration");
/// assert_eq!(table_name("tenant_a"), "tenant_a.configuration");
/// ```
pub fn table_name(schema: &str) -> String {
    if schema.is_empty() {
        CONFIGURATION_TABLE.to_string()
    } else {
        format!("{}.{}", schema, CONFIGURATION_TABLE)
    }
}

/// Read-through / write-through cache over a configuration table.
///
/// # Caching rules
///
/// - A value is cached only when both its key and the value are non-empty, so
///   missing rows, `NULL` values and empty strings are re-read on every call.
/// - `find_all` never overwrites a cached entry with the row it just read.
/// - Store failures are returned as `PersistenceError` and leave the cache as it was.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::{BackedConfigSource, InMemoryStore};
/// use layercfg::domain::EnvironmentSubstitutor;
/// use std::sync::Arc;
///
/// # fn main() -> layercfg::domain::Result<()> {
/// let store = Arc::new(InMemoryStore::new());
/// let substitutor = EnvironmentSubstitutor::from_vars(
///     "APP",
///     vec![("APP_HOST".to_string(), "db.internal".to_string())],
/// );
/// let source = BackedConfigSource::with_substitutor(store, "", substitutor);
///
/// source.save_or_update("datasource.url", "jdbc://${HOST}/app")?;
/// assert_eq!(
///     source.find("datasource.url")?.unwrap().as_str(),
///     "jdbc://${HOST}/app"
/// );
///
/// source.delete_from_cache("datasource.url");
/// assert_eq!(
///     source.find("datasource.url")?.unwrap().as_str(),
///     "jdbc://db.internal/app"
/// );
/// # Ok(())
/// # }
/// ```
pub struct BackedConfigSource {
    store: Arc<dyn KeyValueStore>,
    table: String,
    substitutor: Arc<EnvironmentSubstitutor>,
    cache: DashMap<String, ConfigValue>,
    ordinal: i32,
}

impl BackedConfigSource {
    /// Creates a resolver using the schema and environment prefix from `settings`.
    ///
    /// The substitution map is taken from the process environment now and never
    /// refreshed.
    pub fn new(store: Arc<dyn KeyValueStore>, settings: &ResolverSettings) -> Self {
        let substitutor = EnvironmentSubstitutor::from_env(settings.environment_prefix.as_str());
        Self::with_substitutor(store, &settings.schema, substitutor)
    }

    /// Creates a resolver with an explicit substitutor.
    pub fn with_substitutor(
        store: Arc<dyn KeyValueStore>,
        schema: &str,
        substitutor: EnvironmentSubstitutor,
    ) -> Self {
        let table = table_name(schema);
        tracing::info!(
            table = %table,
            environment_prefix = %substitutor.prefix(),
            "Database-backed configuration source initialized"
        );

        Self {
            store,
            table,
            substitutor: Arc::new(substitutor),
            cache: DashMap::new(),
            ordinal: DEFAULT_ORDINAL,
        }
    }

    /// Overrides the ordinal reported to the aggregator.
    pub fn with_ordinal(mut self, ordinal: i32) -> Self {
        self.ordinal = ordinal;
        self
    }

    /// The schema-qualified table this resolver reads and writes.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Number of cached entries.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Returns the value for `key`, reading the store on a cache miss.
    pub fn find(&self, key: &str) -> Result<Option<ConfigValue>> {
        if let Some(cached) = self.cache.get(key) {
            return Ok(Some(cached.value().clone()));
        }

        let value = self.find_in_store(key)?;
        if let Some(value) = &value {
            self.cache_value(key, value);
        }
        Ok(value)
    }

    /// Returns every row of the table, preferring cached values over fresh ones.
    ///
    /// Rows whose key is not cached yet populate the cache. Rows with a `NULL`
    /// value are reported as `None`.
    pub fn find_all(&self) -> Result<HashMap<String, Option<ConfigValue>>> {
        let rows = self.store.query_all(&self.table).map_err(|e| self.persistence(e))?;

        let mut result = HashMap::with_capacity(rows.len());
        for ConfigEntry { key, value } in rows {
            let fresh = value.map(|raw| self.substitute(&raw));

            let cached = self.cache.get(&key).map(|v| v.value().clone());
            let value = match cached {
                Some(cached) => Some(cached),
                None => {
                    if let Some(fresh) = &fresh {
                        self.cache_value(&key, fresh);
                    }
                    fresh
                }
            };
            result.insert(key, value);
        }

        tracing::debug!(table = %self.table, rows = result.len(), "Loaded all configuration rows");
        Ok(result)
    }

    /// Writes `value` for `key` to the store, then to the cache.
    ///
    /// The store performs the update-or-insert atomically. If it fails, the error
    /// is returned and the cache keeps whatever it held before. The cache stores
    /// `value` exactly as given, without substitution.
    pub fn save_or_update(&self, key: &str, value: &str) -> Result<()> {
        let affected = self
            .store
            .upsert(&self.table, key, value)
            .map_err(|e| self.persistence(e))?;

        tracing::debug!(table = %self.table, key, affected, "Saved configuration value");

        let value = ConfigValue::from(value);
        if key.is_empty() || value.is_empty() {
            // Would not be cached; drop any previous value so the next find re-reads.
            self.cache.remove(key);
        } else {
            self.cache.insert(key.to_string(), value);
        }
        Ok(())
    }

    /// Removes `key` from the cache only. The stored row is not touched.
    pub fn delete_from_cache(&self, key: &str) {
        if self.cache.remove(key).is_some() {
            tracing::debug!(key, "Evicted configuration value from cache");
        }
    }

    fn find_in_store(&self, key: &str) -> Result<Option<ConfigValue>> {
        let row = self
            .store
            .query_one(&self.table, key)
            .map_err(|e| self.persistence(e))?;

        match row {
            Some(ConfigEntry { value, .. }) => Ok(value.map(|raw| self.substitute(&raw))),
            None => {
                tracing::debug!(key, table = %self.table, "No result found for key");
                Ok(None)
            }
        }
    }

    fn substitute(&self, raw: &str) -> ConfigValue {
        if raw.is_empty() {
            return ConfigValue::from(raw);
        }
        ConfigValue::from(self.substitutor.substitute(raw))
    }

    fn cache_value(&self, key: &str, value: &ConfigValue) {
        if !key.is_empty() && !value.is_empty() {
            self.cache.insert(key.to_string(), value.clone());
        }
    }

    fn persistence(&self, error: ConfigError) -> ConfigError {
        if error.is_persistence() {
            return error;
        }
        ConfigError::PersistenceError {
            table: self.table.clone(),
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }
}

impl ConfigSource for BackedConfigSource {
    fn name(&self) -> &str {
        "BackedConfigSource"
    }

    fn ordinal(&self) -> i32 {
        self.ordinal
    }

    fn get_value(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        self.find(key.as_str())
    }

    fn properties(&self) -> Result<HashMap<String, ConfigValue>> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect())
    }
}

impl std::fmt::Debug for BackedConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackedConfigSource")
            .field("table", &self.table)
            .field("cached", &self.cache.len())
            .field("ordinal", &self.ordinal)
            .finish()
    }
}
