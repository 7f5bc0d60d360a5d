//! HTTP routes for session endpoints.

use axum::{
    routing::{any, get, post},
    Router,
};

use crate::adapters::http::router::GatewayAppState;

use super::handlers::{forward_api, legacy_auth, login, logout, logout_redirect, me, refresh};

/// Session routes.
///
/// Login and refresh only intercept `POST`; any other method on those paths
/// is forwarded like the rest of `/api/*`.
pub fn session_routes() -> Router<GatewayAppState> {
    Router::new()
        .route("/api/v1/auth/login", post(login).fallback(forward_api))
        .route("/api/v1/auth/refresh", post(refresh).fallback(forward_api))
        .route("/api/v1/auth/logout", any(logout))
        .route("/api/auth/me", get(me))
        .route("/auth", get(legacy_auth))
        .route("/logout", get(logout_redirect))
}
