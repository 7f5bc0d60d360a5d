//! Backend-of-record configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// Upstream REST backend that owns accounts, tenants and billing state.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Origin every forwarded request is sent to (no trailing slash needed)
    pub base_url: String,

    /// Token refresh endpoint
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,

    /// Identity endpoint behind `/api/auth/me`
    #[serde(default = "default_me_path")]
    pub me_path: String,

    /// Payment confirmation endpoint (must be idempotent per payment)
    #[serde(default = "default_confirm_path")]
    pub confirm_path: String,

    /// Shared secret sent as `X-Webhook-Token` on confirmation calls
    pub confirm_token: Option<SecretString>,

    /// Raw payment forwarding target for provider webhooks; empty disables
    #[serde(default = "default_webhook_forward_path")]
    pub webhook_forward_path: String,

    /// Order pre-registration before checkout; empty disables
    #[serde(default = "default_billing_preview_path")]
    pub billing_preview_path: String,

    /// Demo tenant creation endpoint
    #[serde(default = "default_demo_path")]
    pub demo_path: String,

    /// Onboarding password endpoint
    #[serde(default = "default_set_password_path")]
    pub set_password_path: String,

    /// Self-service tenant creation endpoint for onboarding
    #[serde(default = "default_create_tenant_path")]
    pub create_tenant_path: String,

    /// Tenant status endpoint read for onboarding hints
    #[serde(default = "default_onboarding_status_path")]
    pub onboarding_status_path: String,
}

impl BackendConfig {
    /// Create a configuration with default paths for the given origin.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            refresh_path: default_refresh_path(),
            me_path: default_me_path(),
            confirm_path: default_confirm_path(),
            confirm_token: None,
            webhook_forward_path: default_webhook_forward_path(),
            billing_preview_path: default_billing_preview_path(),
            demo_path: default_demo_path(),
            set_password_path: default_set_password_path(),
            create_tenant_path: default_create_tenant_path(),
            onboarding_status_path: default_onboarding_status_path(),
        }
    }

    /// Base URL without trailing slashes.
    pub fn origin(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }

    /// Webhook forwarding path, if enabled.
    pub fn webhook_forward_path(&self) -> Option<&str> {
        non_blank(&self.webhook_forward_path)
    }

    /// Billing preview path, if enabled.
    pub fn billing_preview_path(&self) -> Option<&str> {
        non_blank(&self.billing_preview_path)
    }

    /// Validate backend configuration
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        let origin = self.origin();
        if origin.is_empty() {
            return Err(ValidationError::MissingRequired("BACKEND__BASE_URL"));
        }
        if !origin.starts_with("http://") && !origin.starts_with("https://") {
            return Err(ValidationError::InvalidUrl("backend.base_url"));
        }
        if production && !origin.starts_with("https://") {
            return Err(ValidationError::BackendMustBeHttps);
        }

        let paths: [(&'static str, &str); 8] = [
            ("backend.refresh_path", self.refresh_path.as_str()),
            ("backend.me_path", self.me_path.as_str()),
            ("backend.confirm_path", self.confirm_path.as_str()),
            ("backend.demo_path", self.demo_path.as_str()),
            ("backend.set_password_path", self.set_password_path.as_str()),
            ("backend.create_tenant_path", self.create_tenant_path.as_str()),
            ("backend.onboarding_status_path", self.onboarding_status_path.as_str()),
            ("backend.webhook_forward_path", self.webhook_forward_path().unwrap_or("/")),
        ];
        for (name, path) in paths {
            if !path.starts_with('/') {
                return Err(ValidationError::InvalidPath(name));
            }
        }
        Ok(())
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn default_refresh_path() -> String {
    "/api/v1/auth/refresh".to_string()
}

fn default_me_path() -> String {
    "/api/v1/auth/me".to_string()
}

fn default_confirm_path() -> String {
    "/api/v1/tenant/billing/confirm".to_string()
}

fn default_webhook_forward_path() -> String {
    "/api/v1/billing/mollie/webhook".to_string()
}

fn default_billing_preview_path() -> String {
    "/api/v1/tenant/billing/preview".to_string()
}

fn default_demo_path() -> String {
    "/api/v1/platform/tenants".to_string()
}

fn default_set_password_path() -> String {
    "/api/v1/auth/set-password".to_string()
}

fn default_create_tenant_path() -> String {
    "/api/v1/onboarding/create-tenant".to_string()
}

fn default_onboarding_status_path() -> String {
    "/api/v1/tenant/status".to_string()
}
