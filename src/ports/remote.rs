// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote key-value client port.

use crate::domain::Result;

/// A blocking client for a distributed key-value system (Consul, etcd, Redis).
///
/// A key that does not exist is `Ok(None)`. Network, timeout or protocol
/// problems are reported as `ConfigError::RemoteTransportError`. Timeouts are
/// the client's responsibility; callers never impose their own.
pub trait RemoteKvClient: Send + Sync {
    /// Fetches and decodes the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// The address this client talks to, for logs and errors.
    fn endpoint(&self) -> &str;
}
