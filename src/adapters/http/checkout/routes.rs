//! HTTP routes for checkout endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::router::GatewayAppState;

use super::handlers::{create_session, payment_status, payment_webhook};

/// Checkout routes.
///
/// # Routes
/// - `POST /api/checkout/create-session` - Quote and create a provider payment
/// - `GET /api/checkout/status?paymentId=` - Success-page polling
/// - `POST /api/mollie/webhook` - Provider notification, no client auth
pub fn checkout_routes() -> Router<GatewayAppState> {
    Router::new()
        .route("/api/checkout/create-session", post(create_session))
        .route("/api/checkout/status", get(payment_status))
        .route("/api/mollie/webhook", post(payment_webhook))
}
