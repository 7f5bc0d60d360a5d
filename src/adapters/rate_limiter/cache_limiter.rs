//! Fixed-window rate limiter over the shared cache.
//!
//! Each check is a plain read-increment-write. Concurrent requests for the
//! same key can read the same count, so a burst may briefly exceed the limit.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::RateLimitConfig;
use crate::ports::{
    RateLimitDecision, RateLimitError, RateLimitKey, RateLimitScope, RateLimiter, SharedCache,
    WINDOW_SECS,
};

/// Rate limiter storing one counter per `(scope, ip, window)` cache key.
#[derive(Clone)]
pub struct CacheRateLimiter {
    cache: Arc<dyn SharedCache>,
    checkout_limit: u32,
    demo_limit: u32,
}

impl CacheRateLimiter {
    pub fn new(cache: Arc<dyn SharedCache>, config: &RateLimitConfig) -> Self {
        Self {
            cache,
            checkout_limit: config.checkout_per_minute,
            demo_limit: config.demo_per_minute,
        }
    }

    /// Configured limit for a scope.
    pub fn limit_for(&self, scope: RateLimitScope) -> u32 {
        match scope {
            RateLimitScope::Checkout => self.checkout_limit,
            RateLimitScope::Demo => self.demo_limit,
        }
    }
}

#[async_trait]
impl RateLimiter for CacheRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitDecision, RateLimitError> {
        let cache_key = key.to_cache_key();
        let limit = self.limit_for(key.scope);

        let current = self
            .cache
            .get(&cache_key)
            .await
            .map_err(|e| RateLimitError::Unavailable(e.to_string()))?
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .unwrap_or(0);

        let count = current.saturating_add(1);
        self.cache
            .put(&cache_key, &count.to_string(), Duration::from_secs(WINDOW_SECS))
            .await
            .map_err(|e| RateLimitError::Unavailable(e.to_string()))?;

        Ok(RateLimitDecision {
            allowed: count <= limit,
            count,
            limit,
        })
    }
}

impl std::fmt::Debug for CacheRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRateLimiter")
            .field("checkout_limit", &self.checkout_limit)
            .field("demo_limit", &self.demo_limit)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::InMemoryCache;
    use crate::domain::foundation::Timestamp;

    fn limiter_with(cache: InMemoryCache, checkout: u32, demo: u32) -> CacheRateLimiter {
        let config = RateLimitConfig {
            checkout_per_minute: checkout,
            demo_per_minute: demo,
        };
        CacheRateLimiter::new(Arc::new(cache), &config)
    }

    #[tokio::test]
    async fn allows_requests_up_to_limit_then_denies() {
        let limiter = limiter_with(InMemoryCache::new(), 3, 30);
        let at = Timestamp::from_unix_secs(1_700_000_000);

        for expected in 1..=3 {
            let key = RateLimitKey::at(RateLimitScope::Checkout, "1.2.3.4", at);
            let decision = limiter.check(key).await.unwrap();
            assert!(decision.allowed);
            assert_eq!(decision.count, expected);
            assert_eq!(decision.limit, 3);
        }

        let key = RateLimitKey::at(RateLimitScope::Checkout, "1.2.3.4", at);
        let decision = limiter.check(key).await.unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.count, 4);
    }

    #[tokio::test]
    async fn new_window_starts_fresh() {
        let limiter = limiter_with(InMemoryCache::new(), 1, 30);
        let at = Timestamp::from_unix_secs(1_700_000_000);

        let first = RateLimitKey::at(RateLimitScope::Checkout, "1.2.3.4", at);
        assert!(limiter.check(first.clone()).await.unwrap().allowed);
        assert!(!limiter.check(first).await.unwrap().allowed);

        let next = RateLimitKey::at(RateLimitScope::Checkout, "1.2.3.4", at.plus_secs(60));
        let decision = limiter.check(next).await.unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.count, 1);
    }

    #[tokio::test]
    async fn different_ips_have_independent_limits() {
        let limiter = limiter_with(InMemoryCache::new(), 1, 30);
        let at = Timestamp::from_unix_secs(1_700_000_000);

        let a = RateLimitKey::at(RateLimitScope::Checkout, "10.0.0.1", at);
        let b = RateLimitKey::at(RateLimitScope::Checkout, "10.0.0.2", at);
        assert!(limiter.check(a.clone()).await.unwrap().allowed);
        assert!(!limiter.check(a).await.unwrap().allowed);
        assert!(limiter.check(b).await.unwrap().allowed);
    }

    #[tokio::test]
    async fn scopes_use_their_own_limit() {
        let limiter = limiter_with(InMemoryCache::new(), 20, 30);
        let key = RateLimitKey::current(RateLimitScope::Demo, "1.1.1.1");
        assert_eq!(limiter.check(key).await.unwrap().limit, 30);
    }

    #[tokio::test]
    async fn garbage_counter_is_treated_as_zero() {
        let cache = InMemoryCache::new();
        let at = Timestamp::from_unix_secs(1_700_000_000);
        let key = RateLimitKey::at(RateLimitScope::Checkout, "1.2.3.4", at);
        cache
            .put(&key.to_cache_key(), "not-a-number", Duration::from_secs(60))
            .await
            .unwrap();

        let limiter = limiter_with(cache, 5, 30);
        assert_eq!(limiter.check(key).await.unwrap().count, 1);
    }

    #[tokio::test]
    async fn cache_failure_is_reported() {
        let cache = InMemoryCache::new();
        cache.set_unavailable(true);
        let limiter = limiter_with(cache, 5, 30);

        let key = RateLimitKey::current(RateLimitScope::Checkout, "1.2.3.4");
        assert!(matches!(
            limiter.check(key).await,
            Err(RateLimitError::Unavailable(_))
        ));
    }
}
