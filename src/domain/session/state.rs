//! Session lifecycle as seen by the gateway for a single request.

use crate::domain::foundation::StateMachine;

/// Where a browser session stands while one request is being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session cookies.
    Unauthenticated,
    /// Session cookies present; the access token may or may not still be valid.
    Authenticated,
    /// A 401 was observed and the refresh token is being exchanged.
    Refreshing,
}

impl StateMachine for SessionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionState::*;
        matches!(
            (self, target),
            (Unauthenticated, Authenticated)
                | (Authenticated, Refreshing)
                | (Authenticated, Unauthenticated)
                | (Refreshing, Authenticated)
                | (Refreshing, Unauthenticated)
        )
    }
}
