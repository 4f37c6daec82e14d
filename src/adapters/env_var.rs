// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process environment resolver.
//!
//! This is the baseline resolver registered below the remote and database
//! sources, so that stored configuration overrides what the environment says.

use crate::domain::{ConfigKey, ConfigValue, Result};
use crate::ports::ConfigSource;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::env;

/// Maximum length for environment variable keys
const MAX_ENV_KEY_LEN: usize = 512;

/// Maximum length for environment variable values
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

/// Ordinal of the environment resolver.
pub const ORDINAL: i32 = 100;

/// Resolver reading configuration from environment variables.
///
/// The environment is captured when the resolver is constructed and kept for
/// its lifetime; later changes to the process environment are not seen. The
/// key mapping is applied to that capture on the first lookup. Variables can be
/// filtered by a prefix (which is stripped), lowercased, and have `_` turned
/// into `.` so that `APP_DB_HOST` answers `db.host`.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::EnvConfigSource;
/// use layercfg::ports::ConfigSource;
/// use std::collections::HashMap;
///
/// let values = HashMap::from([("db.host".to_string(), "localhost".to_string())]);
/// let source = EnvConfigSource::with_values(values);
/// assert_eq!(source.get_str("db.host").unwrap().unwrap().as_str(), "localhost");
/// assert_eq!(source.ordinal(), 100);
/// ```
#[derive(Debug)]
pub struct EnvConfigSource {
    /// Optional prefix to filter environment variables
    prefix: Option<String>,
    lowercase_keys: bool,
    replace_underscores: bool,
    /// Variables as read at construction.
    captured: Vec<(String, String)>,
    snapshot: OnceCell<HashMap<String, String>>,
}

impl EnvConfigSource {
    /// Creates a resolver over all environment variables.
    pub fn new() -> Self {
        Self {
            prefix: None,
            lowercase_keys: false,
            replace_underscores: true,
            captured: capture_environment(),
            snapshot: OnceCell::new(),
        }
    }

    /// Creates a resolver over variables starting with `prefix` (e.g. `"APP_"`).
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::new()
        }
    }

    /// Sets whether variable names are lowercased.
    pub fn lowercase_keys(mut self, enabled: bool) -> Self {
        self.lowercase_keys = enabled;
        self
    }

    /// Sets whether `_` in variable names becomes `.` (default: on).
    pub fn replace_underscores(mut self, enabled: bool) -> Self {
        self.replace_underscores = enabled;
        self
    }

    /// Creates a resolver over a fixed set of values instead of the environment.
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self {
            prefix: None,
            lowercase_keys: false,
            replace_underscores: false,
            captured: Vec::new(),
            snapshot: OnceCell::with_value(values),
        }
    }

    fn load(&self) -> HashMap<String, String> {
        let mut snapshot = HashMap::new();

        for (key, value) in &self.captured {
            let key = match &self.prefix {
                Some(prefix) => match key.strip_prefix(prefix.as_str()) {
                    Some(stripped) => stripped.to_string(),
                    None => continue,
                },
                None => key.clone(),
            };

            let mut key = key;
            if self.lowercase_keys {
                key = key.to_lowercase();
            }
            if self.replace_underscores {
                key = key.replace('_', ".");
            }

            snapshot.insert(key, value.clone());
        }

        tracing::debug!(
            entries = snapshot.len(),
            prefix = ?self.prefix,
            lowercase = self.lowercase_keys,
            replace_underscores = self.replace_underscores,
            "Loaded environment snapshot"
        );

        snapshot
    }

    fn snapshot(&self) -> &HashMap<String, String> {
        self.snapshot.get_or_init(|| self.load())
    }
}

/// Reads the process environment, skipping oversized variables.
fn capture_environment() -> Vec<(String, String)> {
    env::vars()
        .filter(|(key, value)| {
            let keep = key.len() <= MAX_ENV_KEY_LEN && value.len() <= MAX_ENV_VALUE_LEN;
            if !keep {
                tracing::debug!(
                    key_len = key.len(),
                    value_len = value.len(),
                    "Skipping oversized environment variable"
                );
            }
            keep
        })
        .collect()
}

impl Default for EnvConfigSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for EnvConfigSource {
    fn name(&self) -> &str {
        "EnvConfigSource"
    }

    fn ordinal(&self) -> i32 {
        ORDINAL
    }

    fn get_value(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        Ok(self
            .snapshot()
            .get(key.as_str())
            .map(|v| ConfigValue::from(v.as_str())))
    }

    fn properties(&self) -> Result<HashMap<String, ConfigValue>> {
        Ok(self
            .snapshot()
            .iter()
            .map(|(k, v)| (k.clone(), ConfigValue::from(v.as_str())))
            .collect())
    }
}
