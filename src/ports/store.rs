// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backing store port.
//!
//! A `KeyValueStore` persists rows of a `(key primary key, value nullable)`
//! table. Table names arrive already schema-qualified (`schema.configuration`).

use crate::domain::Result;

/// One row of a configuration table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigEntry {
    /// Primary key.
    pub key: String,
    /// Stored value; `None` is a SQL `NULL`, distinct from `""`.
    pub value: Option<String>,
}

impl ConfigEntry {
    /// Creates a row.
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Row persistence used by the database-backed resolver.
///
/// "No matching row" is `Ok(None)`; every `Err` is a `PersistenceError`.
pub trait KeyValueStore: Send + Sync {
    /// Reads the row with primary key `key`.
    fn query_one(&self, table: &str, key: &str) -> Result<Option<ConfigEntry>>;

    /// Reads every row of `table`.
    fn query_all(&self, table: &str) -> Result<Vec<ConfigEntry>>;

    /// Writes `value` for `key`, returning the number of affected rows.
    ///
    /// Implementations must run this as one atomic unit: an UPDATE of the
    /// existing row and, if it affected nothing, an INSERT of a new one. No
    /// other writer may observe or interleave with the intermediate state.
    fn upsert(&self, table: &str, key: &str, value: &str) -> Result<u64>;
}
