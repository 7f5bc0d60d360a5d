//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `EDGE_GATEWAY` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use edge_gateway::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Gateway forwarding to {}", config.backend.origin());
//! ```

mod backend;
mod captcha;
mod error;
mod payment;
mod rate_limit;
mod redis;
mod server;
mod session;

pub use backend::BackendConfig;
pub use captcha::CaptchaConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use rate_limit::RateLimitConfig;
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};
pub use session::SessionConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Only the backend origin is mandatory; every other section has working
/// defaults. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Backend-of-record origin and endpoint paths
    pub backend: BackendConfig,

    /// Payment provider and pricing
    #[serde(default)]
    pub payment: PaymentConfig,

    /// Captcha verification
    #[serde(default)]
    pub captcha: CaptchaConfig,

    /// Session cookie names
    #[serde(default)]
    pub session: SessionConfig,

    /// Per-endpoint rate limits
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Shared cache (Redis); in-process when absent
    #[serde(default)]
    pub redis: RedisConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `EDGE_GATEWAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `EDGE_GATEWAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `EDGE_GATEWAY__BACKEND__BASE_URL=...` -> `backend.base_url = ...`
    /// - `EDGE_GATEWAY__PAYMENT__API_KEY=...` -> `payment.api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("EDGE_GATEWAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.backend.validate(self.is_production())?;
        self.payment.validate()?;
        self.captcha.validate()?;
        self.rate_limit.validate()?;
        self.redis.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
