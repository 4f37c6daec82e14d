// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration service trait definition.
//!
//! `ConfigurationService` is what application code talks to: a merged view over
//! any number of ranked resolvers.

use crate::domain::{ConfigError, ConfigKey, ConfigValue, Result};
use std::collections::HashMap;

/// The main configuration service trait.
///
/// Only `resolve` and `resolve_all` must be implemented; the remaining methods
/// are conveniences layered on top of `resolve`.
///
/// # Examples
///
/// ```rust
/// use layercfg::domain::{ConfigKey, ConfigValue, ConfigurationService, Result};
/// use std::collections::HashMap;
///
/// struct Fixed;
///
/// impl ConfigurationService for Fixed {
///     fn resolve(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
///         Ok((key.as_str() == "greeting").then(|| ConfigValue::from("hello")))
///     }
///
///     fn resolve_all(&self) -> Result<HashMap<String, ConfigValue>> {
///         Ok(HashMap::from([("greeting".to_string(), ConfigValue::from("hello"))]))
///     }
/// }
///
/// let service = Fixed;
/// assert_eq!(service.get(&ConfigKey::from("greeting")).unwrap().as_str(), "hello");
/// assert!(service.get(&ConfigKey::from("missing")).is_err());
/// assert_eq!(service.get_or_default(&ConfigKey::from("missing"), "x").as_str(), "x");
/// ```
pub trait ConfigurationService {
    /// Returns the highest-ranked value for `key`, or `None` if no resolver has one.
    fn resolve(&self, key: &ConfigKey) -> Result<Option<ConfigValue>>;

    /// Returns the merged view of every resolver's enumerable properties.
    fn resolve_all(&self) -> Result<HashMap<String, ConfigValue>>;

    /// Like `resolve`, but treats absence as `ConfigKeyNotFound`.
    fn get(&self, key: &ConfigKey) -> Result<ConfigValue> {
        self.resolve(key)?
            .ok_or_else(|| ConfigError::ConfigKeyNotFound {
                key: key.as_str().to_string(),
            })
    }

    /// Returns the value for `key`, or `default` if it is absent or the lookup failed.
    fn get_or_default(&self, key: &ConfigKey, default: &str) -> ConfigValue {
        match self.resolve(key) {
            Ok(Some(value)) => value,
            Ok(None) => ConfigValue::from(default),
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "Falling back to default value");
                ConfigValue::from(default)
            }
        }
    }

    /// Returns `true` if some resolver provides a value for `key`.
    fn has(&self, key: &ConfigKey) -> bool {
        matches!(self.resolve(key), Ok(Some(_)))
    }
}
