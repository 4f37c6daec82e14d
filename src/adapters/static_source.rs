// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed single-entry resolver.

use crate::domain::{ConfigKey, ConfigValue, Result};
use crate::ports::ConfigSource;
use std::collections::HashMap;

/// The key answered by `StaticConfigSource::default()`.
pub const DEFAULT_KEY: &str = "hello-postfix";
/// The value answered by `StaticConfigSource::default()`.
pub const DEFAULT_VALUE: &str = "over and out";

/// Answers exactly one key with a literal value.
///
/// `properties()` is always empty: this resolver can be asked for its key but
/// never lists it, so it does not show up in an aggregator's merged view.
///
/// ```rust
/// use layercfg::adapters::StaticConfigSource;
/// use layercfg::ports::ConfigSource;
///
/// let source = StaticConfigSource::default();
/// assert_eq!(source.get_str("hello-postfix").unwrap().unwrap().as_str(), "over and out");
/// assert!(source.properties().unwrap().is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct StaticConfigSource {
    key: String,
    value: ConfigValue,
    ordinal: i32,
}

impl StaticConfigSource {
    /// Creates a resolver answering `key` with `value`, at ordinal 120.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: ConfigValue::new(value.into()),
            ordinal: 120,
        }
    }

    /// Overrides the ordinal.
    pub fn with_ordinal(mut self, ordinal: i32) -> Self {
        self.ordinal = ordinal;
        self
    }
}

impl Default for StaticConfigSource {
    fn default() -> Self {
        Self::new(DEFAULT_KEY, DEFAULT_VALUE)
    }
}

impl ConfigSource for StaticConfigSource {
    fn name(&self) -> &str {
        "StaticConfigSource"
    }

    fn ordinal(&self) -> i32 {
        self.ordinal
    }

    fn get_value(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        tracing::trace!(key = %key, "Static source lookup");
        Ok((key.as_str() == self.key).then(|| self.value.clone()))
    }

    fn properties(&self) -> Result<HashMap<String, ConfigValue>> {
        Ok(HashMap::new())
    }
}
