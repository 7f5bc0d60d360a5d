//! HTTP routes for demo and onboarding endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::router::GatewayAppState;

use super::handlers::{create_tenant, onboarding_status, set_password, start_demo};

pub fn signup_routes() -> Router<GatewayAppState> {
    Router::new()
        .route("/api/demo/start", post(start_demo))
        .route("/api/onboarding/set-password", post(set_password))
        .route("/api/onboarding/create-tenant", post(create_tenant))
        .route("/api/onboarding/status", get(onboarding_status))
}
