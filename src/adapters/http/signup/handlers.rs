//! HTTP handlers for demo and onboarding endpoints.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};

use crate::adapters::http::error::GatewayApiError;
use crate::adapters::http::middleware::ClientIp;
use crate::adapters::http::router::GatewayAppState;
use crate::application::handlers::demo::StartDemoCommand;
use crate::adapters::http::relay::relay;
use crate::application::handlers::onboarding::{
    CreateTenantCommand, GetOnboardingStatusQuery, SetPasswordCommand,
};

use super::dto::{SetPasswordRequest, StartDemoRequest, StartDemoResponse};

/// POST /api/demo/start - Provision a trial tenant
pub async fn start_demo(
    State(state): State<GatewayAppState>,
    ClientIp(client_ip): ClientIp,
    body: Bytes,
) -> Result<Json<StartDemoResponse>, GatewayApiError> {
    let req: StartDemoRequest = serde_json::from_slice(&body).unwrap_or_default();
    let cmd = StartDemoCommand {
        trial_days: req.trial_days(),
        email: req.email,
        company: req.company,
        captcha_token: req.turnstile_token,
        client_ip,
    };

    let result = state.demo_handler().handle(cmd).await?;
    Ok(Json(StartDemoResponse {
        ok: true,
        mode: "backend",
        data: result.data,
    }))
}

/// POST /api/onboarding/set-password - Set the password for an invited user
pub async fn set_password(
    State(state): State<GatewayAppState>,
    body: Bytes,
) -> Result<Response, GatewayApiError> {
    let req: SetPasswordRequest = serde_json::from_slice(&body).unwrap_or_default();
    let cmd = SetPasswordCommand {
        token: req.token,
        password: req.password,
    };

    let result = state.set_password_handler().handle(cmd).await?;
    Ok((result.status, Json(result.body)).into_response())
}

/// POST /api/onboarding/create-tenant - Self-service tenant creation
pub async fn create_tenant(
    State(state): State<GatewayAppState>,
    body: Bytes,
) -> Result<Response, GatewayApiError> {
    let body: Value = serde_json::from_slice(&body).unwrap_or_else(|_| json!({}));
    let response = state
        .create_tenant_handler()
        .handle(CreateTenantCommand { body })
        .await?;
    Ok(relay(response))
}

/// GET /api/onboarding/status - Hints for the onboarding UI
pub async fn onboarding_status(
    State(state): State<GatewayAppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Response, GatewayApiError> {
    let query = GetOnboardingStatusQuery {
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        access_cookie: state.cookies().access_token(&jar),
    };

    let status = state.onboarding_status_handler().handle(query).await?;
    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Json(json!({ "ok": true, "mode": status.mode, "hint": status.hint })),
    )
        .into_response())
}
