//! Error responses for gateway endpoints.
//!
//! Every failure body carries `ok: false` and the machine-readable `error`
//! code; upstream and validation failures add a `detail` string.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::foundation::GatewayError;

/// API error type that converts gateway errors to HTTP responses.
#[derive(Debug)]
pub struct GatewayApiError(pub GatewayError);

impl From<GatewayError> for GatewayApiError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

impl GatewayApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            GatewayError::Validation { .. } | GatewayError::Captcha { .. } => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::Auth { .. } => StatusCode::UNAUTHORIZED,
            GatewayError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self.0 {
            GatewayError::Validation { code, message } | GatewayError::Auth { code, message } => {
                json!({ "ok": false, "error": code.to_string(), "detail": message })
            }
            GatewayError::RateLimited { limit } => {
                json!({ "ok": false, "error": "RATE_LIMIT", "limit": limit })
            }
            GatewayError::Captcha { code } | GatewayError::Configuration { code, .. } => {
                json!({ "ok": false, "error": code.to_string() })
            }
            GatewayError::UpstreamUnavailable { code, detail, .. } => {
                json!({ "ok": false, "error": code.to_string(), "detail": detail })
            }
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self.0, "Request failed");
        }

        (status, Json(body)).into_response()
    }
}
