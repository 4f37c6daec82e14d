// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `KeyValueStore`.
//!
//! Useful for tests and for embedding a configuration table that lives only as
//! long as the process.

use crate::domain::Result;
use crate::ports::{ConfigEntry, KeyValueStore};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

type Table = BTreeMap<String, Option<String>>;

/// A `KeyValueStore` holding its tables in process memory.
///
/// Reading a table that was never written returns no rows, the same way an
/// empty SQL table would.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::InMemoryStore;
/// use layercfg::ports::KeyValueStore;
///
/// let store = InMemoryStore::new();
/// assert_eq!(store.upsert("configuration", "k", "v").unwrap(), 1);
/// let row = store.query_one("configuration", "k").unwrap().unwrap();
/// assert_eq!(row.value.as_deref(), Some("v"));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a row, including `NULL` values.
    pub fn with_row(self, table: &str, key: &str, value: Option<&str>) -> Self {
        self.put(table, key, value.map(str::to_string));
        self
    }

    /// Writes a row directly, bypassing `upsert`.
    ///
    /// Simulates an out-of-band change made by another process.
    pub fn put(&self, table: &str, key: &str, value: Option<String>) {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        tables
            .entry(table.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Returns the raw stored value, if the row exists.
    pub fn row(&self, table: &str, key: &str) -> Option<Option<String>> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        tables.get(table).and_then(|t| t.get(key).cloned())
    }
}

impl KeyValueStore for InMemoryStore {
    fn query_one(&self, table: &str, key: &str) -> Result<Option<ConfigEntry>> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        Ok(tables
            .get(table)
            .and_then(|t| t.get(key))
            .map(|value| ConfigEntry::new(key, value.clone())))
    }

    fn query_all(&self, table: &str) -> Result<Vec<ConfigEntry>> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        Ok(tables
            .get(table)
            .map(|t| {
                t.iter()
                    .map(|(k, v)| ConfigEntry::new(k.as_str(), v.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn upsert(&self, table: &str, key: &str, value: &str) -> Result<u64> {
        // One write lock covers both the update and the insert.
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        let rows = tables.entry(table.to_string()).or_default();

        match rows.get_mut(key) {
            Some(existing) => *existing = Some(value.to_string()),
            None => {
                rows.insert(key.to_string(), Some(value.to_string()));
            }
        }
        Ok(1)
    }
}
