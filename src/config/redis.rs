//! Redis configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Shared cache connection settings.
///
/// When no URL is configured the gateway keeps its cache in process memory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL
    pub url: Option<String>,
}

impl RedisConfig {
    /// The configured URL, ignoring blank values.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    /// Validate Redis configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.url() {
            Some(url) if !url.starts_with("redis://") && !url.starts_with("rediss://") => {
                Err(ValidationError::InvalidRedisUrl)
            }
            _ => Ok(()),
        }
    }
}
