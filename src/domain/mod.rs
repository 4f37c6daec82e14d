// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and logic.
//!
//! Nothing in here talks to a database, a remote KV store or a resolver; it
//! holds the vocabulary (keys, values, errors, settings) and the pure
//! environment substitution that the resolvers build on.

pub mod config_key;
pub mod config_value;
pub mod errors;
pub mod service;
pub mod settings;
pub mod substitution;

// Re-export commonly used types
pub use config_key::ConfigKey;
pub use config_value::ConfigValue;
pub use errors::{ConfigError, Result};
pub use service::ConfigurationService;
pub use settings::ResolverSettings;
pub use substitution::EnvironmentSubstitutor;
