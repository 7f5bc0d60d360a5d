//! Rate limit configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Requests allowed per client IP per one-minute window, by endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Payment session creation
    #[serde(default = "default_checkout_per_minute")]
    pub checkout_per_minute: u32,

    /// Demo tenant creation
    #[serde(default = "default_demo_per_minute")]
    pub demo_per_minute: u32,
}

impl RateLimitConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.checkout_per_minute == 0 {
            return Err(ValidationError::InvalidRateLimit("checkout"));
        }
        if self.demo_per_minute == 0 {
            return Err(ValidationError::InvalidRateLimit("demo"));
        }
        Ok(())
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            checkout_per_minute: default_checkout_per_minute(),
            demo_per_minute: default_demo_per_minute(),
        }
    }
}

fn default_checkout_per_minute() -> u32 {
    20
}

fn default_demo_per_minute() -> u32 {
    30
}
