//! Foundation module - Shared domain primitives.
//!
//! Contains the timestamp value object, the state machine trait and the
//! error taxonomy used across the gateway.

mod errors;
mod state_machine;
mod timestamp;

pub use errors::{truncate_detail, ErrorCode, GatewayError, ValidationError};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
