//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddr(String),

    #[error("Invalid URL for {0}: must start with http:// or https://")]
    InvalidUrl(&'static str),

    #[error("Backend base URL must use HTTPS in production")]
    BackendMustBeHttps,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Invalid path for {0}: must start with '/'")]
    InvalidPath(&'static str),

    #[error("Rate limit for {0} must be at least 1 per minute")]
    InvalidRateLimit(&'static str),

    #[error("VAT percentage must be between 0 and 100")]
    InvalidVatPercent,
}
