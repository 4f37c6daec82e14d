// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! `ConfigSource` is implemented by the resolvers in the adapters layer.
//! `KeyValueStore` and `RemoteKvClient` are the collaborators those resolvers
//! consume; adapters ship in-memory, YAML, etcd and Redis implementations.

pub mod remote;
pub mod source;
pub mod store;

// Re-export commonly used types
pub use remote::RemoteKvClient;
pub use source::ConfigSource;
pub use store::{ConfigEntry, KeyValueStore};
