//! CaptchaGate - captcha enforcement policy.
//!
//! | secret | require | token   | outcome                  |
//! |--------|---------|---------|--------------------------|
//! | none   | true    | any     | `CAPTCHA_NOT_CONFIGURED` |
//! | none   | false   | any     | ok, skipped              |
//! | set    | any     | missing | `CAPTCHA_REQUIRED`       |
//! | set    | any     | present | provider verdict         |

use std::sync::Arc;

use crate::domain::foundation::{ErrorCode, GatewayError};
use crate::ports::CaptchaVerifier;

/// Result of a captcha check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptchaOutcome {
    pub ok: bool,
    pub skipped: bool,
    pub error: Option<ErrorCode>,
}

impl CaptchaOutcome {
    fn passed() -> Self {
        Self {
            ok: true,
            skipped: false,
            error: None,
        }
    }

    fn skipped() -> Self {
        Self {
            ok: true,
            skipped: true,
            error: None,
        }
    }

    fn failed(code: ErrorCode) -> Self {
        Self {
            ok: false,
            skipped: false,
            error: Some(code),
        }
    }
}

#[derive(Clone)]
pub struct CaptchaGate {
    /// `None` when no secret is configured.
    verifier: Option<Arc<dyn CaptchaVerifier>>,
    require: bool,
}

impl CaptchaGate {
    pub fn new(verifier: Option<Arc<dyn CaptchaVerifier>>, require: bool) -> Self {
        Self { verifier, require }
    }

    pub async fn verify(&self, token: Option<&str>, client_ip: Option<&str>) -> CaptchaOutcome {
        let Some(verifier) = &self.verifier else {
            return if self.require {
                CaptchaOutcome::failed(ErrorCode::CaptchaNotConfigured)
            } else {
                CaptchaOutcome::skipped()
            };
        };

        let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
            return CaptchaOutcome::failed(ErrorCode::CaptchaRequired);
        };

        match verifier.verify(token, client_ip).await {
            Ok(true) => CaptchaOutcome::passed(),
            Ok(false) => CaptchaOutcome::failed(ErrorCode::CaptchaFailed),
            Err(e) => {
                tracing::warn!(error = %e, "Captcha verification unavailable");
                CaptchaOutcome::failed(ErrorCode::CaptchaFailed)
            }
        }
    }

    /// Like [`verify`](Self::verify), as a `Result` for handlers.
    pub async fn enforce(
        &self,
        token: Option<&str>,
        client_ip: Option<&str>,
    ) -> Result<CaptchaOutcome, GatewayError> {
        let outcome = self.verify(token, client_ip).await;
        match outcome.error {
            None => Ok(outcome),
            Some(ErrorCode::CaptchaNotConfigured) => {
                tracing::error!("Captcha required but no secret configured");
                Err(GatewayError::configuration(
                    ErrorCode::CaptchaNotConfigured,
                    "Captcha verification is required but not configured",
                ))
            }
            Some(code) => Err(GatewayError::Captcha { code }),
        }
    }
}
