//! SetPasswordHandler - relays an onboarding password to the backend.
//!
//! The password is never logged.

use std::sync::Arc;

use http::{Method, StatusCode};
use serde_json::{json, Map, Value};

use crate::domain::foundation::{ErrorCode, GatewayError};
use crate::ports::{BackendClient, UpstreamRequest};

pub const MIN_PASSWORD_CHARS: usize = 12;

#[derive(Clone, Default)]
pub struct SetPasswordCommand {
    pub token: String,
    pub password: String,
}

impl std::fmt::Debug for SetPasswordCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetPasswordCommand")
            .field("token", &"[REDACTED]")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetPasswordResult {
    pub status: StatusCode,
    pub body: Value,
}

pub struct SetPasswordHandler {
    backend: Arc<dyn BackendClient>,
    path: String,
}

impl SetPasswordHandler {
    pub fn new(backend: Arc<dyn BackendClient>, path: impl Into<String>) -> Self {
        Self {
            backend,
            path: path.into(),
        }
    }

    pub async fn handle(&self, cmd: SetPasswordCommand) -> Result<SetPasswordResult, GatewayError> {
        let token = cmd.token.trim();
        if token.is_empty() || cmd.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(GatewayError::validation(
                ErrorCode::ValidationFailed,
                format!("token and password (min {} characters) are required", MIN_PASSWORD_CHARS),
            ));
        }

        let request = UpstreamRequest::json(
            Method::POST,
            self.path.clone(),
            &json!({ "token": token, "password": cmd.password }),
        );
        let response = self.backend.send(request).await.map_err(|e| {
            tracing::warn!(error = %e, "Set-password backend unreachable");
            GatewayError::upstream(ErrorCode::BackendUnavailable, None, &e.to_string(), 400)
        })?;

        let backend_ok = response.is_success();
        let mut body = match response.json() {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        let data_ok = matches!(body.get("ok"), Some(Value::Bool(true)));
        body.insert("ok".to_string(), Value::Bool(backend_ok && data_ok));

        let status = if backend_ok {
            StatusCode::OK
        } else {
            response.status
        };
        tracing::info!(status = status.as_u16(), "Onboarding password relayed");

        Ok(SetPasswordResult {
            status,
            body: Value::Object(body),
        })
    }
}
