//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the gateway to external systems:
//! - `backend` - Backend-of-record HTTP client (reqwest)
//! - `cache` - Shared cache (in-memory, Redis)
//! - `captcha` - Turnstile verification
//! - `http` - Axum routes, handlers and cookies
//! - `mollie` - Payment provider
//! - `rate_limiter` - Fixed-window counters over the shared cache

pub mod backend;
pub mod cache;
pub mod captcha;
pub mod http;
pub mod mollie;
pub mod rate_limiter;

pub use backend::{MockBackendClient, ReqwestBackendClient};
pub use cache::{InMemoryCache, RedisCache};
pub use captcha::{MockCaptchaVerifier, TurnstileVerifier};
pub use mollie::{MockPaymentProvider, MollieConfig, MolliePaymentAdapter};
pub use rate_limiter::CacheRateLimiter;
