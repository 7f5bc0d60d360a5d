//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Handlers own no transport concerns; the HTTP adapter maps their results
//! and errors onto responses and cookies.

pub mod handlers;

pub use handlers::checkout::{
    CheckoutSessionResult, CheckoutSettings, CreateCheckoutSessionCommand,
    CreateCheckoutSessionHandler, GetPaymentStatusHandler, GetPaymentStatusQuery,
    HandlePaymentWebhookHandler, PaymentStatusView, PaymentWebhookCommand,
    ReconcilePaymentHandler,
};
pub use handlers::demo::{StartDemoCommand, StartDemoHandler, StartDemoResult};
pub use handlers::guard::{CaptchaGate, CaptchaOutcome, RateLimitGuard};
pub use handlers::onboarding::{
    CreateTenantCommand, CreateTenantHandler, GetOnboardingStatusHandler,
    GetOnboardingStatusQuery, OnboardingStatus, SetPasswordCommand, SetPasswordHandler,
    SetPasswordResult,
};
pub use handlers::session::{
    CredentialOverride, ForwardCommand, ForwardWithRefreshHandler, Forwarder,
    GetIdentityHandler, GetIdentityQuery, IdentityResult, LoginCommand, LoginHandler,
    LogoutCommand, LogoutHandler, LogoutResult, RefreshSessionCommand,
    RefreshSessionHandler, SessionResponse,
};
