// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared mocks and Docker helpers for integration tests.

#![allow(dead_code)]

use layercfg::adapters::InMemoryStore;
use layercfg::domain::{ConfigError, Result};
use layercfg::ports::{ConfigEntry, KeyValueStore, RemoteKvClient};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock};

/// Remote client that records how often it was called.
#[derive(Debug, Default)]
pub struct CountingClient {
    values: Mutex<HashMap<String, String>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl CountingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RemoteKvClient for CountingClient {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ConfigError::transport("counting", "connection refused"));
        }
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn endpoint(&self) -> &str {
        "counting"
    }
}

/// Store wrapper counting reads and writes, with switchable failures.
#[derive(Debug, Default)]
pub struct FlakyStore {
    pub inner: InMemoryStore,
    reads: AtomicUsize,
    writes: AtomicUsize,
    failing: AtomicBool,
}

impl FlakyStore {
    pub fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self, table: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ConfigError::persistence(table, "database unavailable"));
        }
        Ok(())
    }
}

impl KeyValueStore for FlakyStore {
    fn query_one(&self, table: &str, key: &str) -> Result<Option<ConfigEntry>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check(table)?;
        self.inner.query_one(table, key)
    }

    fn query_all(&self, table: &str) -> Result<Vec<ConfigEntry>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check(table)?;
        self.inner.query_all(table)
    }

    fn upsert(&self, table: &str, key: &str, value: &str) -> Result<u64> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check(table)?;
        self.inner.upsert(table, key, value)
    }
}

static DOCKER_AVAILABLE: OnceLock<bool> = OnceLock::new();

/// Checks once whether `docker ps` succeeds.
pub fn is_docker_available() -> bool {
    *DOCKER_AVAILABLE.get_or_init(|| {
        std::process::Command::new("docker")
            .args(["ps"])
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    })
}

/// Prints why a Docker-based test was skipped.
pub fn print_docker_unavailable_warning(test_name: &str) {
    eprintln!("\nSKIPPED: {} - Docker is not available\n", test_name);
}

/// Routes `tracing` output to the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
