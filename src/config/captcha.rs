//! Captcha (Cloudflare Turnstile) configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct CaptchaConfig {
    /// Server-side verification secret
    pub secret: Option<SecretString>,

    /// Public site key, exposed through `/api/public/config`
    pub site_key: Option<String>,

    /// Enforce verification; when false and no secret is set, checks are skipped
    #[serde(default = "default_require")]
    pub require: bool,

    /// Verification endpoint
    #[serde(default = "default_verify_url")]
    pub verify_url: String,
}

impl CaptchaConfig {
    /// The verification secret, if one is set and not blank.
    pub fn secret(&self) -> Option<&SecretString> {
        self.secret
            .as_ref()
            .filter(|s| !s.expose_secret().trim().is_empty())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.verify_url.starts_with("https://") && !self.verify_url.starts_with("http://") {
            return Err(ValidationError::InvalidUrl("captcha.verify_url"));
        }
        Ok(())
    }
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            secret: None,
            site_key: None,
            require: default_require(),
            verify_url: default_verify_url(),
        }
    }
}

fn default_require() -> bool {
    true
}

fn default_verify_url() -> String {
    "https://challenges.cloudflare.com/turnstile/v0/siteverify".to_string()
}
