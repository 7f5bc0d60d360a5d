//! Browser session carried in cookies.
//!
//! The gateway never stores sessions; it only reads the tokens a browser
//! presents and tells the HTTP layer which cookies to set or clear.

mod state;
mod tokens;

pub use state::SessionState;
pub use tokens::{BearerToken, TokenPair, ACCESS_TOKEN_FIELDS, REFRESH_TOKEN_FIELD};

/// Tokens presented by the client on one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access: Option<BearerToken>,
    pub refresh: Option<BearerToken>,
}

impl Session {
    pub fn new(access: Option<BearerToken>, refresh: Option<BearerToken>) -> Self {
        Self { access, refresh }
    }

    /// A lone refresh token still counts as a session that can be revived.
    pub fn state(&self) -> SessionState {
        if self.access.is_some() || self.refresh.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }
}

/// Cookie changes a handler asks the HTTP layer to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieUpdate {
    /// Leave cookies untouched.
    Keep,
    /// Store the access token and, when present, the refresh token.
    Store(TokenPair),
    /// Expire every session cookie, including the legacy one.
    ClearAll,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(value: &str) -> Option<BearerToken> {
        BearerToken::new(value)
    }

    #[test]
    fn empty_session_is_unauthenticated() {
        assert_eq!(Session::default().state(), SessionState::Unauthenticated);
    }

    #[test]
    fn refresh_only_session_is_authenticated() {
        let session = Session::new(None, token("r"));
        assert_eq!(session.state(), SessionState::Authenticated);
    }

    #[test]
    fn full_session_is_authenticated() {
        let session = Session::new(token("a"), token("r"));
        assert_eq!(session.state(), SessionState::Authenticated);
    }
}
