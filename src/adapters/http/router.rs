//! Gateway router and shared application state.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Request},
    Extension, Router,
};
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::application::handlers::checkout::{
    CheckoutSettings, CreateCheckoutSessionHandler, GetPaymentStatusHandler,
    HandlePaymentWebhookHandler, ReconcilePaymentHandler,
};
use crate::application::handlers::demo::StartDemoHandler;
use crate::application::handlers::guard::{CaptchaGate, RateLimitGuard};
use crate::application::handlers::onboarding::{
    CreateTenantHandler, GetOnboardingStatusHandler, SetPasswordHandler,
};
use crate::application::handlers::session::{
    ForwardWithRefreshHandler, Forwarder, GetIdentityHandler, LoginHandler, LogoutHandler,
    RefreshSessionHandler,
};
use crate::config::AppConfig;
use crate::ports::{BackendClient, CaptchaVerifier, PaymentProvider, RateLimiter, SharedCache};

use super::checkout::checkout_routes;
use super::middleware::ForwardedHeaders;
use super::public::public_routes;
use super::relay::MAX_BODY_BYTES;
use super::session::{forward_api, session_routes, SessionCookies};
use super::signup::signup_routes;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned per request; handlers are built on demand from the Arc-wrapped ports.
/// Optional ports are `None` when their credentials are not configured.
#[derive(Clone)]
pub struct GatewayAppState {
    pub backend: Arc<dyn BackendClient>,
    pub payment_provider: Option<Arc<dyn PaymentProvider>>,
    pub cache: Arc<dyn SharedCache>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub captcha_verifier: Option<Arc<dyn CaptchaVerifier>>,
    pub config: Arc<AppConfig>,
}

impl GatewayAppState {
    pub fn cookies(&self) -> SessionCookies {
        SessionCookies::from_config(&self.config.session)
    }

    fn forwarder(&self) -> Forwarder {
        Forwarder::new(self.backend.clone())
    }

    pub fn login_handler(&self) -> LoginHandler {
        LoginHandler::new(self.forwarder())
    }

    pub fn refresh_handler(&self) -> RefreshSessionHandler {
        RefreshSessionHandler::new(self.backend.clone(), self.config.backend.refresh_path.clone())
    }

    pub fn forward_handler(&self) -> ForwardWithRefreshHandler {
        ForwardWithRefreshHandler::new(self.forwarder(), self.refresh_handler())
    }

    pub fn logout_handler(&self) -> LogoutHandler {
        LogoutHandler::new()
    }

    pub fn identity_handler(&self) -> GetIdentityHandler {
        GetIdentityHandler::new(self.backend.clone(), self.config.backend.me_path.clone())
    }

    fn rate_limit_guard(&self) -> RateLimitGuard {
        RateLimitGuard::new(self.rate_limiter.clone())
    }

    fn captcha_gate(&self) -> CaptchaGate {
        CaptchaGate::new(self.captcha_verifier.clone(), self.config.captcha.require)
    }

    pub fn checkout_handler(&self) -> CreateCheckoutSessionHandler {
        CreateCheckoutSessionHandler::new(
            self.rate_limit_guard(),
            self.captcha_gate(),
            self.payment_provider.clone(),
            self.backend.clone(),
            CheckoutSettings::from_config(&self.config.payment, &self.config.backend),
        )
    }

    fn reconciler(&self) -> Option<Arc<ReconcilePaymentHandler>> {
        self.payment_provider.clone().map(|provider| {
            Arc::new(ReconcilePaymentHandler::new(
                provider,
                self.backend.clone(),
                self.cache.clone(),
                self.config.backend.confirm_path.clone(),
                self.config.backend.confirm_token.clone(),
            ))
        })
    }

    pub fn status_handler(&self) -> GetPaymentStatusHandler {
        GetPaymentStatusHandler::new(self.cache.clone(), self.reconciler())
    }

    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.reconciler(),
            self.backend.clone(),
            self.config.backend.webhook_forward_path().map(str::to_string),
        )
    }

    pub fn demo_handler(&self) -> StartDemoHandler {
        StartDemoHandler::new(
            self.rate_limit_guard(),
            self.captcha_gate(),
            self.backend.clone(),
            self.config.backend.demo_path.clone(),
        )
    }

    pub fn set_password_handler(&self) -> SetPasswordHandler {
        SetPasswordHandler::new(self.backend.clone(), self.config.backend.set_password_path.clone())
    }

    pub fn create_tenant_handler(&self) -> CreateTenantHandler {
        CreateTenantHandler::new(self.backend.clone(), self.config.backend.create_tenant_path.clone())
    }

    pub fn onboarding_status_handler(&self) -> GetOnboardingStatusHandler {
        GetOnboardingStatusHandler::new(
            self.backend.clone(),
            self.config.backend.onboarding_status_path.clone(),
            self.config.backend.me_path.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Router
// ════════════════════════════════════════════════════════════════════════════════

/// `x-request-id` values for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeGatewayRequestId;

impl MakeRequestId for MakeGatewayRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Create the complete gateway router.
///
/// # Routes
/// - Session: `/api/v1/auth/{login,refresh,logout}`, `/api/auth/me`, `/auth`, `/logout`
/// - Checkout: `/api/checkout/{create-session,status}`, `/api/mollie/webhook`
/// - Signup: `/api/demo/start`, `/api/onboarding/{set-password,create-tenant,status}`
/// - Public: `/api/public/config`, `/health`
/// - Anything else under `/api/` is forwarded to the backend
pub fn gateway_router(state: GatewayAppState) -> Router {
    let forwarded = ForwardedHeaders {
        trusted: state.config.server.trust_forwarded_headers,
    };

    Router::new()
        .merge(session_routes())
        .merge(checkout_routes())
        .merge(signup_routes())
        .merge(public_routes())
        .fallback(forward_api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(Extension(forwarded))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeGatewayRequestId))
        .with_state(state)
}
