//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations over ports.

pub mod checkout;
pub mod demo;
pub mod guard;
pub mod onboarding;
pub mod session;
