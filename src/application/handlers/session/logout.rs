//! LogoutHandler - ends the browser session locally.
//!
//! The backend is not called; tokens simply stop being presented.

use crate::domain::foundation::StateMachine;
use crate::domain::session::{CookieUpdate, Session, SessionState};

#[derive(Debug, Clone, Default)]
pub struct LogoutCommand {
    pub session: Session,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutResult {
    pub cookies: CookieUpdate,
    pub was_authenticated: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LogoutHandler;

impl LogoutHandler {
    pub fn new() -> Self {
        Self
    }

    /// Always clears every session cookie, authenticated or not.
    pub fn handle(&self, cmd: LogoutCommand) -> LogoutResult {
        let was_authenticated = cmd
            .session
            .state()
            .can_transition_to(&SessionState::Unauthenticated);
        if was_authenticated {
            tracing::debug!("Clearing session cookies");
        }
        LogoutResult {
            cookies: CookieUpdate::ClearAll,
            was_authenticated,
        }
    }
}
