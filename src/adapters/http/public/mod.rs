//! HTTP adapter for unauthenticated public endpoints.

mod handlers;
mod routes;

pub use handlers::public_config_body;
pub use routes::public_routes;
