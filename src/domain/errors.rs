// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for configuration resolution.
//!
//! A missing key is never an error at the resolver level: every resolver reports
//! absence as `Ok(None)`. The variants here are reserved for failures that mean a
//! resolver, or one of its backends, cannot currently be trusted.

use std::num::{ParseFloatError, ParseIntError};
use std::str::ParseBoolError;
use thiserror::Error;

/// The main error type for configuration operations.
///
/// # Examples
///
/// ```
/// use layercfg::domain::errors::ConfigError;
///
/// fn save() -> Result<(), ConfigError> {
///     Err(ConfigError::PersistenceError {
///         table: "configuration".to_string(),
///         message: "connection refused".to_string(),
///         source: None,
///     })
/// }
///
/// assert!(save().unwrap_err().is_persistence());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The requested configuration key was not provided by any resolver.
    ///
    /// Only the aggregator's required lookup (`get`) produces this variant.
    #[error("Configuration key not found: {key}")]
    ConfigKeyNotFound {
        /// The key that was not found
        key: String,
    },

    /// Failed to convert a configuration value to the requested type.
    #[error(
        "Failed to convert configuration value for key '{key}' to type {target_type}: {source}"
    )]
    TypeConversionError {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An error occurred in a configuration source.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A backing store operation failed for a reason other than absence.
    ///
    /// Surfaced to callers of `find`, `find_all` and `save_or_update`; never cached.
    #[error("Persistence error on table '{table}': {message}")]
    PersistenceError {
        /// The (schema-qualified) table the operation targeted
        table: String,
        /// The error message
        message: String,
        /// The underlying store error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A remote key-value client call failed (network, timeout, protocol).
    ///
    /// The timed cache swallows this variant and records a negative entry instead.
    #[error("Remote transport error talking to '{endpoint}': {message}")]
    RemoteTransportError {
        /// The remote endpoint that was contacted
        endpoint: String,
        /// The error message
        message: String,
        /// The underlying client error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading or writing configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates a `PersistenceError` without an underlying cause.
    pub fn persistence(table: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::PersistenceError {
            table: table.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a `RemoteTransportError` without an underlying cause.
    pub fn transport(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::RemoteTransportError {
            endpoint: endpoint.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Returns `true` if this is a `PersistenceError`.
    pub fn is_persistence(&self) -> bool {
        matches!(self, ConfigError::PersistenceError { .. })
    }

    /// Returns `true` if this is a `RemoteTransportError`.
    pub fn is_transport(&self) -> bool {
        matches!(self, ConfigError::RemoteTransportError { .. })
    }

    /// Creates a TypeConversionError from a ParseIntError.
    pub fn from_parse_int_error(key: String, err: ParseIntError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "integer".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseFloatError.
    pub fn from_parse_float_error(key: String, err: ParseFloatError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "float".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseBoolError.
    pub fn from_parse_bool_error(key: String, err: ParseBoolError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "boolean".to_string(),
            source: Box::new(err),
        }
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
