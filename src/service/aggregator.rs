// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordinal-ranked aggregation of configuration sources.
//!
//! The aggregator is the single entry point for callers: it asks each
//! registered resolver in turn and merges their enumerable properties.

use crate::domain::{ConfigKey, ConfigValue, ConfigurationService, Result};
use crate::ports::ConfigSource;
use std::collections::HashMap;

/// Ranks resolvers by ordinal and answers from the highest-ranked one.
///
/// Resolvers are kept sorted by descending ordinal. Resolvers sharing an
/// ordinal keep their registration order, and the one registered first wins
/// both in `resolve` and in `resolve_all`.
///
/// A resolver error aborts the lookup and is returned to the caller; absence
/// (`Ok(None)`) moves on to the next resolver.
///
/// # Examples
///
/// ```rust
/// use layercfg::prelude::*;
/// use layercfg::adapters::StaticConfigSource;
///
/// # fn main() -> Result<()> {
/// let aggregator = ConfigSourceAggregator::builder()
///     .with_source(Box::new(StaticConfigSource::new("greeting", "low").with_ordinal(50)))
///     .with_source(Box::new(StaticConfigSource::new("greeting", "high")))
///     .build();
///
/// assert_eq!(aggregator.get(&ConfigKey::from("greeting"))?.as_str(), "high");
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ConfigSourceAggregator {
    /// Sorted by descending ordinal, stable on ties.
    sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigSourceAggregator {
    /// Creates an aggregator without resolvers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder.
    pub fn builder() -> ConfigSourceAggregatorBuilder {
        ConfigSourceAggregatorBuilder::new()
    }

    /// Registers a resolver, keeping the list ranked.
    pub fn add_source(&mut self, source: Box<dyn ConfigSource>) {
        tracing::debug!(
            name = source.name(),
            ordinal = source.ordinal(),
            "Registering configuration source"
        );
        self.sources.push(source);
        // `sort_by_key` is stable, so equal ordinals stay in registration order.
        self.sources.sort_by_key(|s| std::cmp::Reverse(s.ordinal()));
    }

    /// Names and ordinals of the registered resolvers, highest rank first.
    pub fn descriptors(&self) -> Vec<(String, i32)> {
        self.sources
            .iter()
            .map(|s| (s.name().to_string(), s.ordinal()))
            .collect()
    }

    /// Number of registered resolvers.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns `true` if no resolver is registered.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl ConfigurationService for ConfigSourceAggregator {
    fn resolve(&self, key: &ConfigKey) -> Result<Option<ConfigValue>> {
        for source in &self.sources {
            match source.get_value(key) {
                Ok(Some(value)) => {
                    tracing::trace!(key = %key, source = source.name(), "Resolved configuration value");
                    return Ok(Some(value));
                }
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(
                        key = %key,
                        source = source.name(),
                        error = %e,
                        "Configuration source failed"
                    );
                    return Err(e);
                }
            }
        }
        Ok(None)
    }

    fn resolve_all(&self) -> Result<HashMap<String, ConfigValue>> {
        let mut merged = HashMap::new();
        // Lowest rank first so that higher ranks overwrite.
        for source in self.sources.iter().rev() {
            merged.extend(source.properties()?);
        }
        Ok(merged)
    }
}

/// Builder for [`ConfigSourceAggregator`].
#[derive(Default)]
pub struct ConfigSourceAggregatorBuilder {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigSourceAggregatorBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resolver.
    pub fn with_source(mut self, source: Box<dyn ConfigSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Adds the process environment as a baseline resolver.
    #[cfg(feature = "env")]
    pub fn with_env_vars(self) -> Self {
        use crate::adapters::EnvConfigSource;
        self.with_source(Box::new(EnvConfigSource::new().lowercase_keys(true)))
    }

    /// Builds the aggregator.
    pub fn build(self) -> ConfigSourceAggregator {
        let mut aggregator = ConfigSourceAggregator::new();
        for source in self.sources {
            aggregator.add_source(source);
        }
        aggregator
    }
}
