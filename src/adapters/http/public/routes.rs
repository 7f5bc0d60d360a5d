//! HTTP routes for public endpoints.

use axum::{routing::get, Router};

use crate::adapters::http::router::GatewayAppState;

use super::handlers::{health, public_config};

pub fn public_routes() -> Router<GatewayAppState> {
    Router::new()
        .route("/api/public/config", get(public_config))
        .route("/health", get(health))
}
