// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration resolution.
//!
//! `layercfg` answers "what is the current value of key K" by asking a ranked
//! list of resolvers, each backed by an in-memory cache in front of an
//! authoritative store:
//!
//! - [`BackedConfigSource`](adapters::BackedConfigSource): a `configuration(key, value)`
//!   table behind an unbounded write-through cache, with `${NAME}` placeholders
//!   filled from prefixed environment variables.
//! - [`TimedCacheConfigSource`](adapters::TimedCacheConfigSource): a remote KV store
//!   (Consul, etcd, Redis) behind a TTL cache that also caches misses and
//!   fetch failures.
//! - [`EnvConfigSource`](adapters::EnvConfigSource) and
//!   [`StaticConfigSource`](adapters::StaticConfigSource): simple baselines.
//!
//! The [`ConfigSourceAggregator`](service::ConfigSourceAggregator) ranks them by
//! ordinal; the highest ordinal that has a value wins.
//!
//! # Architecture
//!
//! - **Domain**: keys, values, errors, settings and environment substitution
//! - **Ports**: `ConfigSource`, `KeyValueStore`, `RemoteKvClient`
//! - **Adapters**: resolvers, stores and remote clients
//! - **Service**: the aggregator
//!
//! # Feature Flags
//!
//! - `env`: environment variable resolver (default)
//! - `yaml`: YAML file store (default)
//! - `consul`: Consul remote client
//! - `etcd`: etcd remote client
//! - `redis`: Redis remote client
//! - `remote`: every remote client
//! - `full`: everything
//!
//! # Quick Start
//!
//! ```rust
//! use layercfg::prelude::*;
//! use layercfg::adapters::{BackedConfigSource, InMemoryStore, StaticConfigSource};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<()> {
//! let store = Arc::new(InMemoryStore::new());
//! let settings = ResolverSettings::default();
//! let database = BackedConfigSource::new(store, &settings);
//! database.save_or_update("greeting", "hello")?;
//!
//! let config = ConfigSourceAggregator::builder()
//!     .with_source(Box::new(database))
//!     .with_source(Box::new(StaticConfigSource::default()))
//!     .build();
//!
//! assert_eq!(config.get(&ConfigKey::from("greeting"))?.as_str(), "hello");
//! assert_eq!(config.get(&ConfigKey::from("hello-postfix"))?.as_str(), "over and out");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
pub mod prelude {
    pub use crate::domain::{
        ConfigError, ConfigKey, ConfigValue, ConfigurationService, EnvironmentSubstitutor,
        ResolverSettings, Result,
    };
    pub use crate::ports::{ConfigEntry, ConfigSource, KeyValueStore, RemoteKvClient};
    pub use crate::service::ConfigSourceAggregator;
}
