// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared tokio runtime for the blocking remote clients.

use crate::domain::{ConfigError, Result};
use once_cell::sync::Lazy;
use std::future::Future;
use tokio::runtime::{Builder, Handle, Runtime};

/// Runtime owning every remote client connection.
static REMOTE_RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("layercfg-remote")
        .enable_all()
        .build()
        .expect("Failed to create runtime for remote configuration clients")
});

/// Runs `future` to completion on the shared runtime.
///
/// Called from inside another runtime, the future is driven from a helper
/// thread so the caller's executor is never blocked re-entrantly.
pub(crate) fn block_on<F>(source_name: &str, future: F) -> Result<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    if Handle::try_current().is_err() {
        return Ok(REMOTE_RUNTIME.block_on(future));
    }

    std::thread::spawn(move || REMOTE_RUNTIME.block_on(future))
        .join()
        .map_err(|_| ConfigError::SourceError {
            source_name: source_name.to_string(),
            message: "Remote client thread panicked".to_string(),
            source: None,
        })
}
