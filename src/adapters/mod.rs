// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer.
//!
//! Resolvers implementing `ConfigSource` (database-backed, timed remote cache,
//! static, environment) and the collaborators they consume: stores
//! implementing `KeyValueStore` and remote clients (Consul, etcd, Redis)
//! implementing `RemoteKvClient`.

pub mod backed;
#[cfg(feature = "consul")]
pub mod consul;
#[cfg(feature = "env")]
pub mod env_var;
#[cfg(feature = "etcd")]
pub mod etcd;
pub mod memory_store;
#[cfg(feature = "redis")]
pub mod redis;
#[cfg(any(feature = "consul", feature = "etcd", feature = "redis"))]
mod runtime;
pub mod static_source;
pub mod timed_cache;
#[cfg(feature = "yaml")]
pub mod yaml_store;

pub use backed::BackedConfigSource;
#[cfg(feature = "consul")]
pub use consul::ConsulKvClient;
#[cfg(feature = "env")]
pub use env_var::EnvConfigSource;
#[cfg(feature = "etcd")]
pub use etcd::EtcdKvClient;
pub use memory_store::InMemoryStore;
#[cfg(feature = "redis")]
pub use redis::{RedisKvClient, RedisStorageMode};
pub use static_source::StaticConfigSource;
pub use timed_cache::{CacheStats, TimedCacheConfigSource};
#[cfg(feature = "yaml")]
pub use yaml_store::YamlFileStore;
