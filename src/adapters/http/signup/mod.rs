//! HTTP adapter for self-service signup: demo tenants and onboarding.

mod dto;
mod handlers;
mod routes;

pub use dto::{SetPasswordRequest, StartDemoRequest, StartDemoResponse};
pub use routes::signup_routes;
