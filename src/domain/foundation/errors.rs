//! Error types for the domain layer.

use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be at least {min} characters")]
    TooShort { field: String, min: usize },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates a minimum length validation error.
    pub fn too_short(field: impl Into<String>, min: usize) -> Self {
        ValidationError::TooShort {
            field: field.into(),
            min,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Machine-readable error codes returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    EmailRequired,
    PaymentIdRequired,

    // Authentication errors
    NotAuthenticated,
    NoRefreshToken,
    RefreshFailed,

    // Abuse protection
    RateLimit,
    CaptchaRequired,
    CaptchaFailed,

    // Upstream errors
    MollieCreateFailed,
    MollieFetchFailed,
    BackendDemoCreateFailed,
    BackendUnavailable,

    // Deployment errors
    CaptchaNotConfigured,
    PaymentProviderNotConfigured,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::EmailRequired => "EMAIL_REQUIRED",
            ErrorCode::PaymentIdRequired => "PAYMENT_ID_REQUIRED",
            ErrorCode::NotAuthenticated => "not_authenticated",
            ErrorCode::NoRefreshToken => "no_refresh_token",
            ErrorCode::RefreshFailed => "refresh_failed",
            ErrorCode::RateLimit => "RATE_LIMIT",
            ErrorCode::CaptchaRequired => "CAPTCHA_REQUIRED",
            ErrorCode::CaptchaFailed => "CAPTCHA_FAILED",
            ErrorCode::MollieCreateFailed => "MOLLIE_CREATE_FAILED",
            ErrorCode::MollieFetchFailed => "MOLLIE_FETCH_FAILED",
            ErrorCode::BackendDemoCreateFailed => "BACKEND_DEMO_CREATE_FAILED",
            ErrorCode::BackendUnavailable => "BACKEND_UNAVAILABLE",
            ErrorCode::CaptchaNotConfigured => "CAPTCHA_NOT_CONFIGURED",
            ErrorCode::PaymentProviderNotConfigured => "PAYMENT_PROVIDER_NOT_CONFIGURED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Failure taxonomy shared by every gateway operation.
///
/// Validation and rate-limit failures are raised before any upstream call.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("[{code}] {message}")]
    Validation { code: ErrorCode, message: String },

    #[error("[{code}] {message}")]
    Auth { code: ErrorCode, message: String },

    #[error("Rate limit of {limit} requests per minute exceeded")]
    RateLimited { limit: u32 },

    #[error("Captcha rejected: {code}")]
    Captcha { code: ErrorCode },

    #[error("[{code}] upstream unavailable: {detail}")]
    UpstreamUnavailable {
        code: ErrorCode,
        status: Option<u16>,
        detail: String,
    },

    #[error("[{code}] {message}")]
    Configuration { code: ErrorCode, message: String },
}

impl GatewayError {
    pub fn validation(code: ErrorCode, message: impl Into<String>) -> Self {
        GatewayError::Validation {
            code,
            message: message.into(),
        }
    }

    pub fn auth(code: ErrorCode, message: impl Into<String>) -> Self {
        GatewayError::Auth {
            code,
            message: message.into(),
        }
    }

    /// Upstream failure with the diagnostic body cut to `max_chars`.
    pub fn upstream(
        code: ErrorCode,
        status: Option<u16>,
        detail: &str,
        max_chars: usize,
    ) -> Self {
        GatewayError::UpstreamUnavailable {
            code,
            status,
            detail: truncate_detail(detail, max_chars),
        }
    }

    pub fn configuration(code: ErrorCode, message: impl Into<String>) -> Self {
        GatewayError::Configuration {
            code,
            message: message.into(),
        }
    }

    /// The client-facing code of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            GatewayError::Validation { code, .. }
            | GatewayError::Auth { code, .. }
            | GatewayError::Captcha { code }
            | GatewayError::UpstreamUnavailable { code, .. }
            | GatewayError::Configuration { code, .. } => *code,
            GatewayError::RateLimited { .. } => ErrorCode::RateLimit,
        }
    }
}

impl From<ValidationError> for GatewayError {
    fn from(err: ValidationError) -> Self {
        GatewayError::validation(ErrorCode::ValidationFailed, err.to_string())
    }
}

/// Cuts `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_detail(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
