// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration source trait definition.
//!
//! `ConfigSource` is the capability every resolver offers to the aggregator:
//! answer a single key, enumerate what it knows, and identify itself with a
//! name and an ordinal.

use crate::domain::{ConfigKey, ConfigValue, Result};
use std::collections::HashMap;

/// A resolver that answers "value for key" from one backend.
///
/// # Thread Safety
///
/// Resolvers are shared between threads and queried through `&self`, so any
/// caching they do must be internally synchronized.
///
/// # Ordinal
///
/// The ordinal ranks resolvers inside an aggregator. Higher ordinals win when
/// two resolvers provide the same key. Typical values:
///
/// - **120**: remote KV store, static overrides
/// - **100**: process environment
///
/// # Examples
///
/// ```rust
/// use layercfg::ports::ConfigSource;
/// use layercfg::domain::{ConfigKey, ConfigValue, Result};
/// use std::collections::HashMap;
///
/// struct Constant;
///
/// impl ConfigSource for Constant {
///     fn name(&self) -> &str {
///         "constant"
///     }
///
///     fn ordinal(&self) -> i32 {
///         10
///     }
///
///     fn get_value(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
///         Ok((key.as_str() == "answer").then(|| ConfigValue::from("42")))
///     }
///
///     fn properties(&self) -> Result<HashMap<String, ConfigValue>> {
///         Ok(HashMap::from([("answer".to_string(), ConfigValue::from("42"))]))
///     }
/// }
///
/// let source = Constant;
/// assert_eq!(source.get_str("answer").unwrap().unwrap().as_str(), "42");
/// ```
pub trait ConfigSource: Send + Sync {
    /// Returns the name of this resolver, used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Returns the ordinal (priority) of this resolver. Higher wins.
    fn ordinal(&self) -> i32;

    /// Retrieves the value for `key`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(ConfigValue))` - The resolver has a value
    /// * `Ok(None)` - The key is absent in this resolver
    /// * `Err(ConfigError)` - The resolver's backend failed and cannot be trusted
    fn get_value(&self, key: &ConfigKey) -> Result<Option<ConfigValue>>;

    /// Returns every property this resolver is able to enumerate.
    ///
    /// Resolvers are allowed to return fewer keys than `get_value` can answer.
    fn properties(&self) -> Result<HashMap<String, ConfigValue>>;

    /// Retrieves the value for a key given as a string slice.
    fn get_str(&self, key: &str) -> Result<Option<ConfigValue>> {
        self.get_value(&ConfigKey::from(key))
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn ordinal(&self) -> i32 {
        (**self).ordinal()
    }

    fn get_value(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        (**self).get_value(key)
    }

    fn properties(&self) -> Result<HashMap<String, ConfigValue>> {
        (**self).properties()
    }
}
