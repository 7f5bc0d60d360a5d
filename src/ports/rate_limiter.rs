//! Rate limiting port for protecting expensive endpoints.
//!
//! Limits are counted per `(scope, client IP)` in clock-aligned one-minute
//! windows. Counting is approximate: implementations may let a burst slightly
//! exceed the limit when concurrent requests race on the same window.

use async_trait::async_trait;
use std::fmt;

use crate::domain::foundation::Timestamp;

/// Length of one fixed window.
pub const WINDOW_SECS: u64 = 60;

/// Port for rate limiting operations.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Counts one request against `key` and reports whether it is allowed.
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitDecision, RateLimitError>;
}

/// Protected endpoint family.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum RateLimitScope {
    /// Payment session creation.
    Checkout,
    /// Demo tenant creation.
    Demo,
}

impl RateLimitScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateLimitScope::Checkout => "checkout",
            RateLimitScope::Demo => "demo",
        }
    }
}

impl fmt::Display for RateLimitScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Key identifying one counter: scope, client and window.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct RateLimitKey {
    pub scope: RateLimitScope,
    pub client_ip: String,
    /// `floor(unix_secs / 60)` of the request time.
    pub window_id: u64,
}

impl RateLimitKey {
    /// Key for a request arriving now.
    pub fn current(scope: RateLimitScope, client_ip: &str) -> Self {
        Self::at(scope, client_ip, Timestamp::now())
    }

    /// Key for a request arriving at `at`.
    pub fn at(scope: RateLimitScope, client_ip: &str, at: Timestamp) -> Self {
        Self {
            scope,
            client_ip: client_ip.to_string(),
            window_id: at.as_unix_secs() / WINDOW_SECS,
        }
    }

    /// Returns the cache key string for this counter.
    pub fn to_cache_key(&self) -> String {
        format!(
            "ratelimit:{}:{}:{}",
            self.scope.as_str(),
            self.client_ip,
            self.window_id
        )
    }
}

/// Outcome of counting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests seen in this window, including this one.
    pub count: u32,
    pub limit: u32,
}

/// Errors that can occur during rate limiting operations.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    /// Counter storage is unavailable.
    #[error("rate limiter unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_clock_aligned() {
        let start = Timestamp::from_unix_secs(1_700_000_040);
        let key = RateLimitKey::at(RateLimitScope::Checkout, "1.2.3.4", start);
        assert_eq!(key.window_id, 1_700_000_040 / 60);

        let same = RateLimitKey::at(RateLimitScope::Checkout, "1.2.3.4", start.plus_secs(19));
        assert_eq!(same.window_id, key.window_id);

        let next = RateLimitKey::at(RateLimitScope::Checkout, "1.2.3.4", start.plus_secs(20));
        assert_eq!(next.window_id, key.window_id + 1);
    }

    #[test]
    fn cache_key_format() {
        let key = RateLimitKey {
            scope: RateLimitScope::Demo,
            client_ip: "10.0.0.1".to_string(),
            window_id: 42,
        };
        assert_eq!(key.to_cache_key(), "ratelimit:demo:10.0.0.1:42");
    }

    #[test]
    fn scopes_do_not_share_counters() {
        let now = Timestamp::now();
        let checkout = RateLimitKey::at(RateLimitScope::Checkout, "1.1.1.1", now);
        let demo = RateLimitKey::at(RateLimitScope::Demo, "1.1.1.1", now);
        assert_ne!(checkout.to_cache_key(), demo.to_cache_key());
    }
}
