//! HTTP adapter for cookie sessions and API forwarding.

mod cookies;
mod dto;
mod handlers;
mod routes;

pub use cookies::{is_secure_request, SessionCookies};
pub use dto::{LegacyAuthQuery, RefreshRequest, RefreshResponse};
pub use handlers::{forward_api, safe_next_path, DEFAULT_NEXT_PATH, LOGIN_PAGE};
pub use routes::session_routes;
