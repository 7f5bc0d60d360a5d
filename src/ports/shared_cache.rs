//! Shared cache port.
//!
//! A best-effort TTL key-value store used for rate-limit counters and
//! payment status records. Entries may vanish at any time; callers must
//! treat the cache as a latency optimization and never as a source of truth.

use std::time::Duration;

use async_trait::async_trait;

/// Port for the cross-request TTL cache.
#[async_trait]
pub trait SharedCache: Send + Sync {
    /// Returns the value stored under `key`, if present and not expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

/// Errors that can occur when talking to the cache.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    /// Cache backend is unreachable or rejected the command.
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}
