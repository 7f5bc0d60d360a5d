//! Tenant onboarding: invited-user passwords, self-service tenants and UI hints.

mod create_tenant;
mod get_onboarding_status;
mod set_password;

pub use create_tenant::{CreateTenantCommand, CreateTenantHandler};
pub use get_onboarding_status::{
    GetOnboardingStatusHandler, GetOnboardingStatusQuery, OnboardingStatus,
};
pub use set_password::{SetPasswordCommand, SetPasswordHandler, SetPasswordResult, MIN_PASSWORD_CHARS};
