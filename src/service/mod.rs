// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer.
//!
//! Contains the aggregator that implements `ConfigurationService` on top of
//! any number of ranked `ConfigSource`s.

pub mod aggregator;

// Re-export commonly used types
pub use aggregator::{ConfigSourceAggregator, ConfigSourceAggregatorBuilder};
