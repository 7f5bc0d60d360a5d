//! Public configuration and health endpoints.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::adapters::http::router::GatewayAppState;
use crate::config::AppConfig;

/// GET /api/public/config - Settings the static frontend needs at runtime
pub async fn public_config(State(state): State<GatewayAppState>) -> Response {
    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(public_config_body(&state.config)),
    )
        .into_response()
}

/// GET /health - Liveness check
pub async fn health() -> &'static str {
    "ok"
}

/// Never includes secrets; only the site key and public URLs.
pub fn public_config_body(config: &AppConfig) -> Value {
    json!({
        "TURNSTILE_SITEKEY": config.captcha.site_key.clone().unwrap_or_default(),
        "REQUIRE_TURNSTILE": if config.captcha.require { "1" } else { "0" },
        "BACKEND_API_BASE": config.backend.origin(),
        "CHECKOUT_RETURN_BASE": config.payment.return_base().unwrap_or_default(),
    })
}
