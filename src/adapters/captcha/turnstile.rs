//! Cloudflare Turnstile verifier.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::CaptchaConfig;
use crate::ports::{CaptchaError, CaptchaVerifier};

#[derive(Debug, Deserialize)]
struct SiteverifyResponse {
    #[serde(default)]
    success: bool,
    #[serde(rename = "error-codes", default)]
    error_codes: Vec<String>,
}

/// Posts tokens to the Turnstile `siteverify` endpoint.
pub struct TurnstileVerifier {
    secret: SecretString,
    verify_url: String,
    http_client: reqwest::Client,
}

impl TurnstileVerifier {
    pub fn new(secret: SecretString, verify_url: impl Into<String>) -> Self {
        Self {
            secret,
            verify_url: verify_url.into(),
            http_client: reqwest::Client::new(),
        }
    }

    /// `None` when the secret is missing or blank.
    pub fn from_config(config: &CaptchaConfig) -> Option<Self> {
        let secret = config.secret()?;
        Some(Self::new(secret.clone(), config.verify_url.clone()))
    }
}

#[async_trait]
impl CaptchaVerifier for TurnstileVerifier {
    async fn verify(&self, token: &str, remote_ip: Option<&str>) -> Result<bool, CaptchaError> {
        let mut form = vec![
            ("secret", self.secret.expose_secret().as_str()),
            ("response", token),
        ];
        if let Some(ip) = remote_ip {
            form.push(("remoteip", ip));
        }

        let response = self
            .http_client
            .post(&self.verify_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| CaptchaError::Unavailable(e.to_string()))?;

        // Anything that is not a well-formed answer counts as a failed check.
        let body = match response.json::<SiteverifyResponse>().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable siteverify response");
                return Ok(false);
            }
        };

        if !body.success {
            tracing::info!(error_codes = ?body.error_codes, "Captcha token rejected");
        }
        Ok(body.success)
    }
}

impl std::fmt::Debug for TurnstileVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnstileVerifier")
            .field("verify_url", &self.verify_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn verifier_for(server: &mockito::Server) -> TurnstileVerifier {
        TurnstileVerifier::new(
            SecretString::new("site-secret".to_string()),
            format!("{}/turnstile/v0/siteverify", server.url()),
        )
    }

    #[tokio::test]
    async fn posts_secret_token_and_ip() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/turnstile/v0/siteverify")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("secret".into(), "site-secret".into()),
                Matcher::UrlEncoded("response".into(), "tok".into()),
                Matcher::UrlEncoded("remoteip".into(), "1.2.3.4".into()),
            ]))
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let ok = verifier_for(&server)
            .verify("tok", Some("1.2.3.4"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(ok);
    }

    #[tokio::test]
    async fn rejected_token_is_false() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/turnstile/v0/siteverify")
            .with_body(r#"{"success":false,"error-codes":["invalid-input-response"]}"#)
            .create_async()
            .await;

        assert!(!verifier_for(&server).verify("bad", None).await.unwrap());
    }

    #[tokio::test]
    async fn garbage_response_is_false() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/turnstile/v0/siteverify")
            .with_status(500)
            .with_body("<html>")
            .create_async()
            .await;

        assert!(!verifier_for(&server).verify("tok", None).await.unwrap());
    }

    #[test]
    fn blank_secret_builds_no_verifier() {
        let config = CaptchaConfig {
            secret: Some(SecretString::new(" ".to_string())),
            ..CaptchaConfig::default()
        };
        assert!(TurnstileVerifier::from_config(&config).is_none());

        let config = CaptchaConfig {
            secret: Some(SecretString::new("site-secret".to_string())),
            ..CaptchaConfig::default()
        };
        assert!(TurnstileVerifier::from_config(&config).is_some());
    }

    #[test]
    fn debug_hides_secret() {
        let verifier = TurnstileVerifier::new(
            SecretString::new("site-secret".to_string()),
            "https://example.test",
        );
        assert!(!format!("{:?}", verifier).contains("site-secret"));
    }
}
