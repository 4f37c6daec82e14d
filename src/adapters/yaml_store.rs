// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML file `KeyValueStore`.
//!
//! The file holds one mapping per table:
//!
//! ```yaml
//! configuration:
//!   datasource.url: jdbc://${DB_HOST}/app
//!   feature.flag: ~
//! tenant_a.configuration:
//!   datasource.url: jdbc://tenant-a/app
//! ```
//!
//! The file is the source of truth and is re-read on every query. Writes go to a
//! sibling temporary file that is then renamed over the original.

use crate::domain::{ConfigError, Result};
use crate::ports::{ConfigEntry, KeyValueStore};
use directories::ProjectDirs;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Maximum size of the store file (10MB)
const MAX_YAML_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default file name used by `from_default_location`.
pub const DEFAULT_FILE_NAME: &str = "configuration.yaml";

type Tables = BTreeMap<String, BTreeMap<String, Option<String>>>;

/// A `KeyValueStore` persisted as a YAML document.
///
/// A file that does not exist yet behaves like a database with empty tables;
/// the first `upsert` creates it.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::YamlFileStore;
/// use layercfg::ports::KeyValueStore;
///
/// # fn main() -> layercfg::domain::Result<()> {
/// let dir = tempfile::tempdir()?;
/// let store = YamlFileStore::new(dir.path().join("config.yaml"));
///
/// store.upsert("configuration", "k", "v")?;
/// let row = store.query_one("configuration", "k")?.unwrap();
/// assert_eq!(row.value.as_deref(), Some("v"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct YamlFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl YamlFileStore {
    /// Creates a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Creates a store in the OS-appropriate configuration directory.
    ///
    /// ```rust,no_run
    /// use layercfg::adapters::YamlFileStore;
    ///
    /// let store = YamlFileStore::from_default_location("myapp", "com.example").unwrap();
    /// ```
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::SourceError {
                source_name: "yaml-store".to_string(),
                message: "Failed to determine project directories".to_string(),
                source: None,
            })?;

        Ok(Self::new(proj_dirs.config_dir().join(DEFAULT_FILE_NAME)))
    }

    /// Returns the path of the backing file.
    pub fn file_path(&self) -> &Path {
        &self.path
    }

    fn read_tables(&self, table: &str) -> Result<Tables> {
        let metadata = match fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Tables::new()),
            Err(e) => return Err(self.io_error(table, "Failed to read store metadata", e)),
        };

        if metadata.len() > MAX_YAML_FILE_SIZE {
            return Err(ConfigError::persistence(
                table,
                format!(
                    "Store file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_YAML_FILE_SIZE
                ),
            ));
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| self.io_error(table, "Failed to read store file", e))?;
        parse_tables(&content).map_err(|e| ConfigError::PersistenceError {
            table: table.to_string(),
            message: "Store file is not a valid table document".to_string(),
            source: Some(Box::new(e)),
        })
    }

    fn write_tables(&self, table: &str, tables: &Tables) -> Result<()> {
        let content = serde_yaml::to_string(tables).map_err(|e| ConfigError::PersistenceError {
            table: table.to_string(),
            message: "Failed to serialize store".to_string(),
            source: Some(Box::new(e)),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| self.io_error(table, "Failed to create store directory", e))?;
        }

        let tmp = self.path.with_extension("yaml.tmp");
        fs::write(&tmp, content).map_err(|e| self.io_error(table, "Failed to write store file", e))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| self.io_error(table, "Failed to replace store file", e))
    }

    fn io_error(&self, table: &str, message: &str, e: std::io::Error) -> ConfigError {
        ConfigError::PersistenceError {
            table: table.to_string(),
            message: format!("{}: {}", message, self.path.display()),
            source: Some(Box::new(e)),
        }
    }
}

impl KeyValueStore for YamlFileStore {
    fn query_one(&self, table: &str, key: &str) -> Result<Option<ConfigEntry>> {
        let tables = self.read_tables(table)?;
        Ok(tables
            .get(table)
            .and_then(|rows| rows.get(key))
            .map(|value| ConfigEntry::new(key, value.clone())))
    }

    fn query_all(&self, table: &str) -> Result<Vec<ConfigEntry>> {
        let tables = self.read_tables(table)?;
        Ok(tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .map(|(k, v)| ConfigEntry::new(k.as_str(), v.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn upsert(&self, table: &str, key: &str, value: &str) -> Result<u64> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut tables = self.read_tables(table)?;
        tables
            .entry(table.to_string())
            .or_default()
            .insert(key.to_string(), Some(value.to_string()));
        self.write_tables(table, &tables)?;

        tracing::debug!(path = %self.path.display(), table, key, "Wrote configuration row");
        Ok(1)
    }
}

/// Parses a table document, rendering scalar values as strings.
fn parse_tables(content: &str) -> std::result::Result<Tables, ParseTablesError> {
    if content.trim().is_empty() {
        return Ok(Tables::new());
    }
    let document: Value = serde_yaml::from_str(content).map_err(ParseTablesError::Yaml)?;

    let mut tables = Tables::new();
    let top = match document {
        Value::Null => return Ok(tables),
        Value::Mapping(map) => map,
        _ => return Err(ParseTablesError::Shape("top level must be a mapping of tables".into())),
    };

    for (table, rows) in top {
        let table = scalar_to_string(&table)
            .ok_or_else(|| ParseTablesError::Shape("table names must be scalars".into()))?;
        let rows = match rows {
            Value::Null => Default::default(),
            Value::Mapping(rows) => rows,
            _ => return Err(ParseTablesError::Shape(format!("table '{}' must be a mapping", table))),
        };

        let entries = tables.entry(table.clone()).or_default();
        for (key, value) in rows {
            let key = scalar_to_string(&key).ok_or_else(|| {
                ParseTablesError::Shape(format!("keys in table '{}' must be scalars", table))
            })?;
            let value = match value {
                Value::Null => None,
                other => Some(scalar_to_string(&other).ok_or_else(|| {
                    ParseTablesError::Shape(format!("value of '{}' must be a scalar", key))
                })?),
            };
            entries.insert(key, value);
        }
    }

    Ok(tables)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
enum ParseTablesError {
    #[error("invalid YAML: {0}")]
    Yaml(#[source] serde_yaml::Error),
    #[error("unexpected document shape: {0}")]
    Shape(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn store_with(content: &str) -> (tempfile::NamedTempFile, YamlFileStore) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        let store = YamlFileStore::new(file.path());
        (file, store)
    }

    #[test]
    fn test_parse_tables_with_nulls_and_scalars() {
        let tables = parse_tables(
            "configuration:\n  a: text\n  b: 42\n  c: true\n  d: ~\n  e: ''\ntenant.configuration:\n  a: t\n",
        )
        .unwrap();

        let rows = &tables["configuration"];
        assert_eq!(rows["a"], Some("text".to_string()));
        assert_eq!(rows["b"], Some("42".to_string()));
        assert_eq!(rows["c"], Some("true".to_string()));
        assert_eq!(rows["d"], None);
        assert_eq!(rows["e"], Some(String::new()));
        assert_eq!(tables["tenant.configuration"]["a"], Some("t".to_string()));
    }

    #[test]
    fn test_parse_rejects_nested_values() {
        assert!(parse_tables("configuration:\n  a:\n    nested: 1\n").is_err());
        assert!(parse_tables("- a\n- b\n").is_err());
        assert!(parse_tables("").unwrap().is_empty());
    }

    #[test]
    fn test_query_reads_file() {
        let (_file, store) = store_with("configuration:\n  k: v\n  n: ~\n");

        assert_eq!(
            store.query_one("configuration", "k").unwrap(),
            Some(ConfigEntry::new("k", Some("v".to_string())))
        );
        assert_eq!(
            store.query_one("configuration", "n").unwrap(),
            Some(ConfigEntry::new("n", None))
        );
        assert_eq!(store.query_one("configuration", "x").unwrap(), None);
        assert_eq!(store.query_all("configuration").unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = YamlFileStore::new(dir.path().join("absent.yaml"));
        assert!(store.query_all("configuration").unwrap().is_empty());
    }

    #[test]
    fn test_upsert_persists_and_preserves_other_tables() {
        let (file, store) = store_with("configuration:\n  k: old\nother.configuration:\n  z: 1\n");

        store.upsert("configuration", "k", "new").unwrap();
        store.upsert("configuration", "added", "yes").unwrap();

        let reopened = YamlFileStore::new(file.path());
        assert_eq!(
            reopened.query_one("configuration", "k").unwrap().unwrap().value.as_deref(),
            Some("new")
        );
        assert_eq!(reopened.query_all("configuration").unwrap().len(), 2);
        assert_eq!(reopened.query_all("other.configuration").unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_file_is_persistence_error() {
        let (_file, store) = store_with("configuration: [unclosed\n");
        let err = store.query_one("configuration", "k").unwrap_err();
        assert!(err.is_persistence());
        assert!(store.upsert("configuration", "k", "v").unwrap_err().is_persistence());
    }
}
