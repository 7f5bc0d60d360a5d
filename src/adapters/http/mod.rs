//! HTTP adapters - the public edge surface.
//!
//! Each area has its own routes and handlers; all share [`GatewayAppState`].

pub mod checkout;
pub mod error;
pub mod middleware;
pub mod public;
pub mod relay;
pub mod router;
pub mod session;
pub mod signup;

// Re-export key types for convenience
pub use error::GatewayApiError;
pub use router::{gateway_router, GatewayAppState, MakeGatewayRequestId};
