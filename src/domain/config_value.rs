// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration value type with type-safe conversions.
//!
//! Resolvers hand out `Option<ConfigValue>`: `None` means the key has no value,
//! which is distinct from `Some` of an empty string.

use crate::domain::errors::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A resolved configuration value.
///
/// # Examples
///
/// ```
/// use layercfg::domain::ConfigValue;
///
/// let value = ConfigValue::from("42");
/// assert_eq!(value.as_str(), "42");
/// assert_eq!(value.as_u32("pool.size").unwrap(), 42);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigValue(String);

impl ConfigValue {
    /// Creates a new `ConfigValue` from a `String`.
    pub fn new(value: String) -> Self {
        ConfigValue(value)
    }

    /// Returns the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns an owned copy of the value.
    pub fn as_string(&self) -> String {
        self.0.clone()
    }

    /// Returns `true` if the value is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts the value to a boolean.
    ///
    /// Accepts `true/yes/1/on` and `false/no/0/off`, case-insensitively.
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        match self.0.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(true),
            "false" | "no" | "0" | "off" => Ok(false),
            _ => self
                .0
                .parse::<bool>()
                .map_err(|e| ConfigError::from_parse_bool_error(key.to_string(), e)),
        }
    }

    /// Converts the value to an `i32`.
    pub fn as_i32(&self, key: &str) -> Result<i32> {
        self.0
            .trim()
            .parse::<i32>()
            .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e))
    }

    /// Converts the value to an `i64`.
    pub fn as_i64(&self, key: &str) -> Result<i64> {
        self.0
            .trim()
            .parse::<i64>()
            .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e))
    }

    /// Converts the value to a `u32`.
    pub fn as_u32(&self, key: &str) -> Result<u32> {
        self.0
            .trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e))
    }

    /// Converts the value to a `u64`.
    pub fn as_u64(&self, key: &str) -> Result<u64> {
        self.0
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e))
    }

    /// Converts the value to an `f64`.
    pub fn as_f64(&self, key: &str) -> Result<f64> {
        self.0
            .trim()
            .parse::<f64>()
            .map_err(|e| ConfigError::from_parse_float_error(key.to_string(), e))
    }

    /// Parses the value into any type that implements `FromStr`.
    ///
    /// Surrounding whitespace is ignored, as for the `as_*` conversions.
    ///
    /// # Examples
    ///
    /// ```
    /// use layercfg::domain::ConfigValue;
    /// use std::net::IpAddr;
    ///
    /// let value = ConfigValue::from("127.0.0.1");
    /// let ip: IpAddr = value.parse("remote.host").unwrap();
    /// assert!(ip.is_loopback());
    /// ```
    pub fn parse<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.0
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::TypeConversionError {
                key: key.to_string(),
                target_type: std::any::type_name::<T>().to_string(),
                source: Box::new(e),
            })
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue(s.to_string())
    }
}

impl From<ConfigValue> for String {
    fn from(value: ConfigValue) -> Self {
        value.0
    }
}

impl AsRef<str> for ConfigValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_is_a_value() {
        let value = ConfigValue::from("");
        assert!(value.is_empty());
        assert_eq!(Some(value), Some(ConfigValue::from("")));
    }

    #[test]
    fn test_as_bool_variants() {
        for val in ["true", "YES", "1", "On"] {
            assert!(ConfigValue::from(val).as_bool("k").unwrap(), "{}", val);
        }
        for val in ["false", "No", "0", "OFF"] {
            assert!(!ConfigValue::from(val).as_bool("k").unwrap(), "{}", val);
        }
        assert!(ConfigValue::from("maybe").as_bool("k").is_err());
    }

    #[test]
    fn test_numeric_conversions() {
        assert_eq!(ConfigValue::from("-42").as_i32("k").unwrap(), -42);
        assert_eq!(ConfigValue::from(" 10 ").as_u64("k").unwrap(), 10);
        assert_eq!(ConfigValue::from("2.5").as_f64("k").unwrap(), 2.5);
        assert!(ConfigValue::from("-1").as_u32("k").is_err());
        assert!(ConfigValue::from("x").as_i64("k").is_err());
    }

    #[test]
    fn test_conversion_error_names_key() {
        let err = ConfigValue::from("abc").as_u64("remote.validitySeconds").unwrap_err();
        assert!(err.to_string().contains("remote.validitySeconds"));
    }

    #[test]
    fn test_parse_custom_type() {
        let value = ConfigValue::from("not_an_ip");
        let result: Result<std::net::IpAddr> = value.parse("k");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_ignores_surrounding_whitespace() {
        let value = ConfigValue::from(" 10.0.0.1\n");
        let ip: std::net::IpAddr = value.parse("remote.host").unwrap();
        assert_eq!(ip.to_string(), "10.0.0.1");
        assert_eq!(value.as_str(), " 10.0.0.1\n");
    }

    #[test]
    fn test_string_roundtrip() {
        let s: String = ConfigValue::from("over and out").into();
        assert_eq!(s, "over and out");
    }
}
