//! Session handlers: cookie-backed login, refresh, logout and forwarding.

mod forward_with_refresh;
mod forwarder;
mod get_identity;
mod login;
mod logout;
mod refresh_session;

pub use forward_with_refresh::{ForwardCommand, ForwardWithRefreshHandler};
pub use forwarder::{CredentialOverride, Forwarder, STRIPPED_HEADERS};
pub use get_identity::{GetIdentityHandler, GetIdentityQuery, IdentityResult};
pub use login::{LoginCommand, LoginHandler, SessionResponse};
pub use logout::{LogoutCommand, LogoutHandler, LogoutResult};
pub use refresh_session::{RefreshSessionCommand, RefreshSessionHandler};
