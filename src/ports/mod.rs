//! Ports - Interfaces to the outside world.
//!
//! Each port is an async trait implemented by one or more adapters.

mod backend_client;
mod captcha_verifier;
mod payment_provider;
mod rate_limiter;
mod shared_cache;

pub use backend_client::{BackendClient, UpstreamError, UpstreamRequest, UpstreamResponse};
pub use captcha_verifier::{CaptchaError, CaptchaVerifier};
pub use payment_provider::{
    CheckoutSession, CreatePaymentRequest, PaymentError, PaymentErrorCode, PaymentProvider,
};
pub use rate_limiter::{
    RateLimitDecision, RateLimitError, RateLimitKey, RateLimitScope, RateLimiter, WINDOW_SECS,
};
pub use shared_cache::{CacheError, SharedCache};
