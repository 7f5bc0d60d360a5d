//! Captcha verification port.

use async_trait::async_trait;

/// Port for checking a client-supplied captcha token with the provider.
///
/// Implementations hold the verification secret; enforcement policy lives
/// in the application layer.
#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    /// Returns the provider's success flag for `token`.
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> Result<bool, CaptchaError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CaptchaError {
    #[error("captcha provider unavailable: {0}")]
    Unavailable(String),
}
