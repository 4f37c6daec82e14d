// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration key newtype.
//!
//! Keys are the external identity of a configuration entry. Uniqueness is
//! enforced by whichever backend owns the key (the `configuration` table's
//! primary key, or the remote KV namespace), never by this type.

use std::fmt;

/// A type-safe wrapper for configuration keys.
///
/// # Examples
///
/// ```
/// use layercfg::domain::ConfigKey;
///
/// let key = ConfigKey::from("datasource.url");
/// assert_eq!(key.as_str(), "datasource.url");
/// assert!(!key.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigKey(String);

impl ConfigKey {
    /// Creates a new `ConfigKey` from a `String`.
    pub fn new(key: String) -> Self {
        ConfigKey(key)
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty key.
    ///
    /// Empty keys are accepted everywhere but never written to a cache.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts the `ConfigKey` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        ConfigKey(s)
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        ConfigKey(s.to_string())
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ConfigKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_key_from_str_and_string() {
        assert_eq!(ConfigKey::from("a.b").as_str(), "a.b");
        assert_eq!(ConfigKey::from("a.b".to_string()).as_str(), "a.b");
        assert_eq!(ConfigKey::new("a.b".to_string()).into_string(), "a.b");
    }

    #[test]
    fn test_config_key_display() {
        let key = ConfigKey::from("hello-postfix");
        assert_eq!(format!("{}", key), "hello-postfix");
    }

    #[test]
    fn test_config_key_empty() {
        assert!(ConfigKey::from("").is_empty());
        assert!(!ConfigKey::from("x").is_empty());
    }

    #[test]
    fn test_config_key_borrowed_lookup() {
        let mut map = HashMap::new();
        map.insert(ConfigKey::from("db.host"), "localhost");

        assert_eq!(map.get("db.host"), Some(&"localhost"));
        assert_eq!(map.get("db.port"), None);
    }
}
