// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests for resolver precedence inside the aggregator.

#![cfg(feature = "env")]

mod common;

use common::{CountingClient, FlakyStore};
use layercfg::adapters::{
    BackedConfigSource, EnvConfigSource, InMemoryStore, StaticConfigSource, TimedCacheConfigSource,
};
use layercfg::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

fn env(pairs: &[(&str, &str)]) -> EnvConfigSource {
    EnvConfigSource::with_values(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
    )
}

fn database(rows: &[(&str, &str)]) -> BackedConfigSource {
    let store = rows.iter().fold(InMemoryStore::new(), |store, (k, v)| {
        store.with_row("configuration", k, Some(*v))
    });
    BackedConfigSource::with_substitutor(Arc::new(store), "", EnvironmentSubstitutor::disabled())
}

#[test]
fn test_static_beats_environment() {
    let config = ConfigSourceAggregator::builder()
        .with_source(Box::new(env(&[("hello-postfix", "from-env")])))
        .with_source(Box::new(StaticConfigSource::default()))
        .build();

    assert_eq!(
        config.get(&ConfigKey::from("hello-postfix")).unwrap().as_str(),
        "over and out"
    );
}

#[test]
fn test_higher_ordinal_wins_regardless_of_registration_order() {
    let high = StaticConfigSource::new("k", "high").with_ordinal(120);
    let low = StaticConfigSource::new("k", "low").with_ordinal(50);

    let forward = ConfigSourceAggregator::builder()
        .with_source(Box::new(high.clone()))
        .with_source(Box::new(low.clone()))
        .build();
    let backward = ConfigSourceAggregator::builder()
        .with_source(Box::new(low))
        .with_source(Box::new(high))
        .build();

    for config in [forward, backward] {
        assert_eq!(config.get(&ConfigKey::from("k")).unwrap().as_str(), "high");
    }
}

#[test]
fn test_equal_ordinals_keep_registration_order() {
    let config = ConfigSourceAggregator::builder()
        .with_source(Box::new(StaticConfigSource::new("k", "first").with_ordinal(100)))
        .with_source(Box::new(StaticConfigSource::new("k", "second").with_ordinal(100)))
        .build();

    assert_eq!(config.get(&ConfigKey::from("k")).unwrap().as_str(), "first");
}

#[test]
fn test_fallthrough_to_lower_ranks() {
    let client = Arc::new(CountingClient::new().with_value("remote.only", "r"));

    let config = ConfigSourceAggregator::builder()
        .with_source(Box::new(env(&[("env.only", "e"), ("shared", "env")])))
        .with_source(Box::new(database(&[("db.only", "d"), ("shared", "db")])))
        .with_source(Box::new(TimedCacheConfigSource::new(
            client,
            Duration::from_secs(60),
        )))
        .build();

    assert_eq!(config.get(&ConfigKey::from("remote.only")).unwrap().as_str(), "r");
    assert_eq!(config.get(&ConfigKey::from("db.only")).unwrap().as_str(), "d");
    assert_eq!(config.get(&ConfigKey::from("env.only")).unwrap().as_str(), "e");
    assert_eq!(config.get(&ConfigKey::from("shared")).unwrap().as_str(), "db");
    assert!(!config.has(&ConfigKey::from("nowhere")));

    let descriptors = config.descriptors();
    let ordinals: Vec<i32> = descriptors.iter().map(|(_, ordinal)| *ordinal).collect();
    assert_eq!(ordinals, vec![120, 110, 100]);
}

#[test]
fn test_resolve_all_merges_by_rank() {
    let config = ConfigSourceAggregator::builder()
        .with_source(Box::new(env(&[("a", "env"), ("b", "env")])))
        .with_source(Box::new(database(&[("a", "db")])))
        .build();

    let all = config.resolve_all().unwrap();
    assert_eq!(all.get("a"), Some(&ConfigValue::from("db")));
    assert_eq!(all.get("b"), Some(&ConfigValue::from("env")));
}

#[test]
fn test_failing_resolver_surfaces_error() {
    let store = Arc::new(FlakyStore::new(InMemoryStore::new()));
    store.set_failing(true);
    let backed =
        BackedConfigSource::with_substitutor(store, "", EnvironmentSubstitutor::disabled());

    let config = ConfigSourceAggregator::builder()
        .with_source(Box::new(backed))
        .with_source(Box::new(env(&[("k", "env")])))
        .build();

    let key = ConfigKey::from("k");
    assert!(config.resolve(&key).unwrap_err().is_persistence());
    assert_eq!(config.get_or_default(&key, "fallback").as_str(), "fallback");
    assert!(!config.has(&key));
}

#[test]
fn test_typed_access_through_aggregator() {
    let config = ConfigSourceAggregator::builder()
        .with_source(Box::new(database(&[
            ("server.port", "8080"),
            ("feature.enabled", " yes "),
            ("ratio", "0.25"),
        ])))
        .build();

    let port = config.get(&ConfigKey::from("server.port")).unwrap();
    assert_eq!(port.as_u32("server.port").unwrap(), 8080);
    let enabled = config.get(&ConfigKey::from("feature.enabled")).unwrap();
    assert!(enabled.as_bool("feature.enabled").unwrap());
    let ratio = config.get(&ConfigKey::from("ratio")).unwrap();
    assert!((ratio.as_f64("ratio").unwrap() - 0.25).abs() < f64::EPSILON);

    let missing = config.get(&ConfigKey::from("missing")).unwrap_err();
    assert!(matches!(missing, ConfigError::ConfigKeyNotFound { .. }));
}
