//! Captcha verifier adapters.

mod mock;
mod turnstile;

pub use mock::MockCaptchaVerifier;
pub use turnstile::TurnstileVerifier;
