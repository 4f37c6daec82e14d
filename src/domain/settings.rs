// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolver settings read from the environment or explicit process properties.

use crate::domain::{ConfigValue, Result};
use std::collections::HashMap;
use std::env;
use std::time::Duration;

/// Option name for the SQL schema qualifier.
pub const SCHEMA: &str = "schema";
/// Option name for the substitution environment prefix.
pub const ENVIRONMENT_PREFIX: &str = "environmentPrefix";
/// Option name for the remote KV address.
pub const REMOTE_HOST: &str = "remote.host";
/// Option name for the remote cache validity window, in seconds.
pub const REMOTE_VALIDITY_SECONDS: &str = "remote.validitySeconds";

/// Default remote KV address.
pub const DEFAULT_REMOTE_HOST: &str = "localhost";
/// Default remote cache validity window, in seconds.
pub const DEFAULT_VALIDITY_SECONDS: u64 = 10;

/// Effective settings shared by the resolvers.
///
/// # Examples
///
/// ```
/// use layercfg::domain::ResolverSettings;
/// use std::time::Duration;
///
/// let settings = ResolverSettings::default();
/// assert_eq!(settings.schema, "");
/// assert_eq!(settings.remote_host, "localhost");
/// assert_eq!(settings.remote_validity, Duration::from_secs(10));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Schema qualifier for table names; empty means unqualified.
    pub schema: String,
    /// Environment prefix (without the trailing `_`); empty disables substitution.
    pub environment_prefix: String,
    /// Address of the remote KV backend.
    pub remote_host: String,
    /// How long a remote lookup stays authoritative.
    pub remote_validity: Duration,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            schema: String::new(),
            environment_prefix: String::new(),
            remote_host: DEFAULT_REMOTE_HOST.to_string(),
            remote_validity: Duration::from_secs(DEFAULT_VALIDITY_SECONDS),
        }
    }
}

impl ResolverSettings {
    /// Reads settings from the process environment only.
    pub fn from_env() -> Result<Self> {
        Self::from_env_and_properties(&HashMap::new())
    }

    /// Reads settings from the environment, falling back to `properties`.
    ///
    /// For each option the environment wins, first under its dotted name
    /// (`remote.host`) and then under the upper-snake alias (`REMOTE_HOST`).
    pub fn from_env_and_properties(properties: &HashMap<String, String>) -> Result<Self> {
        Self::from_lookup(|name| {
            env::var(name)
                .ok()
                .or_else(|| env::var(env_alias(name)).ok())
                .or_else(|| properties.get(name).cloned())
        })
    }

    /// Reads settings through an arbitrary lookup function.
    ///
    /// The lookup receives the option names defined in this module.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let remote_validity = match lookup(REMOTE_VALIDITY_SECONDS) {
            Some(raw) => Duration::from_secs(ConfigValue::from(raw).as_u64(REMOTE_VALIDITY_SECONDS)?),
            None => defaults.remote_validity,
        };

        let settings = Self {
            schema: lookup(SCHEMA).unwrap_or(defaults.schema),
            environment_prefix: lookup(ENVIRONMENT_PREFIX).unwrap_or(defaults.environment_prefix),
            remote_host: lookup(REMOTE_HOST).unwrap_or(defaults.remote_host),
            remote_validity,
        };

        tracing::debug!(?settings, "Resolved resolver settings");
        Ok(settings)
    }

    /// Sets the schema qualifier.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Sets the substitution environment prefix.
    pub fn with_environment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.environment_prefix = prefix.into();
        self
    }

    /// Sets the remote KV address.
    pub fn with_remote_host(mut self, host: impl Into<String>) -> Self {
        self.remote_host = host.into();
        self
    }

    /// Sets the remote cache validity window.
    pub fn with_remote_validity(mut self, validity: Duration) -> Self {
        self.remote_validity = validity;
        self
    }
}

/// `remote.validitySeconds` -> `REMOTE_VALIDITY_SECONDS`, `environmentPrefix` -> `ENVIRONMENT_PREFIX`.
fn env_alias(name: &str) -> String {
    let mut alias = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c == '.' {
            alias.push('_');
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower {
            alias.push('_');
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        alias.extend(c.to_uppercase());
    }
    alias
}
