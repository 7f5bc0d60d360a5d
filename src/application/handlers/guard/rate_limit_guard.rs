//! RateLimitGuard - turns limiter decisions into gateway errors.

use std::sync::Arc;

use crate::domain::foundation::GatewayError;
use crate::ports::{RateLimitDecision, RateLimitKey, RateLimitScope, RateLimiter};

#[derive(Clone)]
pub struct RateLimitGuard {
    limiter: Arc<dyn RateLimiter>,
}

impl RateLimitGuard {
    pub fn new(limiter: Arc<dyn RateLimiter>) -> Self {
        Self { limiter }
    }

    /// Counts one request for `(scope, client_ip)` in the current window.
    ///
    /// When the counter store is down the request is let through.
    pub async fn check(
        &self,
        scope: RateLimitScope,
        client_ip: &str,
    ) -> Result<Option<RateLimitDecision>, GatewayError> {
        let key = RateLimitKey::current(scope, client_ip);
        match self.limiter.check(key).await {
            Ok(decision) if decision.allowed => Ok(Some(decision)),
            Ok(decision) => {
                tracing::info!(
                    scope = %scope,
                    client_ip,
                    count = decision.count,
                    limit = decision.limit,
                    "Rate limit exceeded"
                );
                Err(GatewayError::RateLimited {
                    limit: decision.limit,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, scope = %scope, "Rate limiter unavailable, allowing request");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::InMemoryCache;
    use crate::adapters::rate_limiter::CacheRateLimiter;
    use crate::config::RateLimitConfig;
    use crate::domain::foundation::ErrorCode;

    fn guard(cache: InMemoryCache, limit: u32) -> RateLimitGuard {
        let config = RateLimitConfig {
            checkout_per_minute: limit,
            demo_per_minute: limit,
        };
        RateLimitGuard::new(Arc::new(CacheRateLimiter::new(Arc::new(cache), &config)))
    }

    #[tokio::test]
    async fn n_plus_first_request_is_rejected_with_limit() {
        let guard = guard(InMemoryCache::new(), 2);
        assert!(guard.check(RateLimitScope::Checkout, "9.9.9.9").await.is_ok());
        assert!(guard.check(RateLimitScope::Checkout, "9.9.9.9").await.is_ok());

        let err = guard
            .check(RateLimitScope::Checkout, "9.9.9.9")
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::RateLimit);
        assert!(matches!(err, GatewayError::RateLimited { limit: 2 }));
    }

    #[tokio::test]
    async fn fails_open_when_cache_is_down() {
        let cache = InMemoryCache::new();
        cache.set_unavailable(true);
        let guard = guard(cache, 1);

        for _ in 0..3 {
            assert!(guard
                .check(RateLimitScope::Demo, "9.9.9.9")
                .await
                .unwrap()
                .is_none());
        }
    }
}
