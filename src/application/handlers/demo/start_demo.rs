//! StartDemoHandler - creates a trial tenant at the backend.

use std::sync::Arc;

use http::Method;
use serde_json::{json, Value};

use crate::application::handlers::guard::{CaptchaGate, RateLimitGuard};
use crate::domain::foundation::{ErrorCode, GatewayError};
use crate::ports::{BackendClient, RateLimitScope, UpstreamRequest};

pub const DEFAULT_TRIAL_DAYS: u32 = 14;

const DETAIL_MAX_CHARS: usize = 400;

#[derive(Debug, Clone, Default)]
pub struct StartDemoCommand {
    pub email: String,
    pub company: String,
    pub trial_days: Option<u32>,
    pub captcha_token: Option<String>,
    pub client_ip: String,
}

/// Backend reply for the created tenant.
#[derive(Debug, Clone, PartialEq)]
pub struct StartDemoResult {
    pub data: Value,
}

pub struct StartDemoHandler {
    rate_limit: RateLimitGuard,
    captcha: CaptchaGate,
    backend: Arc<dyn BackendClient>,
    demo_path: String,
}

impl StartDemoHandler {
    pub fn new(
        rate_limit: RateLimitGuard,
        captcha: CaptchaGate,
        backend: Arc<dyn BackendClient>,
        demo_path: impl Into<String>,
    ) -> Self {
        Self {
            rate_limit,
            captcha,
            backend,
            demo_path: demo_path.into(),
        }
    }

    pub async fn handle(&self, cmd: StartDemoCommand) -> Result<StartDemoResult, GatewayError> {
        self.rate_limit
            .check(RateLimitScope::Demo, &cmd.client_ip)
            .await?;

        let email = cmd.email.trim();
        if email.is_empty() {
            return Err(GatewayError::validation(
                ErrorCode::EmailRequired,
                "email is required",
            ));
        }

        self.captcha
            .enforce(cmd.captcha_token.as_deref(), Some(&cmd.client_ip))
            .await?;

        let request = UpstreamRequest::json(
            Method::POST,
            self.demo_path.clone(),
            &json!({
                "name": tenant_name(cmd.company.trim(), email),
                "trial_days": cmd.trial_days.unwrap_or(DEFAULT_TRIAL_DAYS),
                "admin_email": email,
            }),
        );

        let response = self.backend.send(request).await.map_err(|e| {
            tracing::warn!(error = %e, "Demo backend unreachable");
            GatewayError::upstream(
                ErrorCode::BackendDemoCreateFailed,
                None,
                &e.to_string(),
                DETAIL_MAX_CHARS,
            )
        })?;

        if !response.is_success() {
            tracing::warn!(status = response.status.as_u16(), "Demo tenant creation rejected");
            return Err(GatewayError::upstream(
                ErrorCode::BackendDemoCreateFailed,
                Some(response.status.as_u16()),
                &response.text(),
                DETAIL_MAX_CHARS,
            ));
        }

        tracing::info!("Demo tenant created");
        let data = response
            .json()
            .unwrap_or_else(|| json!({ "raw": response.text() }));
        Ok(StartDemoResult { data })
    }
}

fn tenant_name(company: &str, email: &str) -> String {
    if !company.is_empty() {
        return company.to_string();
    }
    let local = email.split('@').next().unwrap_or(email);
    format!("{} (demo)", local)
}
