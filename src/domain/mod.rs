//! Domain layer containing gateway business rules and value types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (timestamps, state machine, error taxonomy)
//! - `session` - Cookie-carried browser sessions and token normalization
//! - `payment` - Pricing, payment intents and confirmation records

pub mod foundation;
pub mod payment;
pub mod session;
