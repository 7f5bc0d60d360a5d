//! Rate limiter adapters.
//!
//! `CacheRateLimiter` counts requests in a [`SharedCache`](crate::ports::SharedCache),
//! so the backing store (in-memory or Redis) decides whether counters are
//! shared across gateway instances.

mod cache_limiter;

pub use cache_limiter::CacheRateLimiter;
