//! Abuse guards run ahead of side-effecting endpoints.
//!
//! Order matters: the rate limit is checked first, then captcha, and only
//! then does a handler call the payment provider or the backend.

mod captcha_gate;
mod rate_limit_guard;

pub use captcha_gate::{CaptchaGate, CaptchaOutcome};
pub use rate_limit_guard::RateLimitGuard;
