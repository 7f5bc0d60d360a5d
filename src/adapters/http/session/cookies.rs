//! Session cookie construction.
//!
//! All session cookies are `HttpOnly`, `SameSite=Lax` and scoped to `/`.
//! `Secure` is set only when the request reached the edge over HTTPS.

use axum::http::{HeaderMap, Uri};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::config::SessionConfig;
use crate::domain::session::{BearerToken, CookieUpdate, Session};

#[derive(Debug, Clone)]
pub struct SessionCookies {
    access: String,
    refresh: String,
    legacy: String,
    domain: Option<String>,
    legacy_max_age: time::Duration,
}

impl SessionCookies {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            access: config.access_cookie.clone(),
            refresh: config.refresh_cookie.clone(),
            legacy: config.legacy_cookie.clone(),
            domain: config.cookie_domain().map(str::to_string),
            legacy_max_age: time::Duration::seconds(config.legacy_max_age_secs),
        }
    }

    /// Tokens the browser presented.
    pub fn session(&self, jar: &CookieJar) -> Session {
        Session::new(self.token(jar, &self.access), self.token(jar, &self.refresh))
    }

    pub fn access_token(&self, jar: &CookieJar) -> Option<BearerToken> {
        self.token(jar, &self.access)
    }

    fn token(&self, jar: &CookieJar, name: &str) -> Option<BearerToken> {
        jar.get(name).and_then(|c| BearerToken::new(c.value()))
    }

    pub fn apply(&self, jar: CookieJar, update: &CookieUpdate, secure: bool) -> CookieJar {
        match update {
            CookieUpdate::Keep => jar,
            CookieUpdate::Store(pair) => {
                let jar = jar.add(self.cookie(&self.access, pair.access.as_str(), secure));
                match &pair.refresh {
                    Some(refresh) => jar.add(self.cookie(&self.refresh, refresh.as_str(), secure)),
                    None => jar,
                }
            }
            CookieUpdate::ClearAll => [&self.access, &self.refresh, &self.legacy]
                .into_iter()
                .fold(jar, |jar, name| jar.add(self.expired(name, secure))),
        }
    }

    /// Access cookie set by the legacy `/auth?token=` bridge, with a fixed lifetime.
    pub fn legacy_access(&self, jar: CookieJar, token: &BearerToken, secure: bool) -> CookieJar {
        let mut cookie = self.cookie(&self.access, token.as_str(), secure);
        cookie.set_max_age(self.legacy_max_age);
        jar.add(cookie)
    }

    fn expired(&self, name: &str, secure: bool) -> Cookie<'static> {
        let mut cookie = self.cookie(name, "", secure);
        cookie.set_max_age(time::Duration::ZERO);
        cookie
    }

    fn cookie(&self, name: &str, value: &str, secure: bool) -> Cookie<'static> {
        let mut cookie = Cookie::build((name.to_string(), value.to_string()))
            .http_only(true)
            .secure(secure)
            .same_site(SameSite::Lax)
            .path("/")
            .build();
        if let Some(domain) = &self.domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }
}

/// HTTPS as seen by the client: the URI scheme, or the first
/// `X-Forwarded-Proto` value set by the terminating proxy.
pub fn is_secure_request(uri: &Uri, headers: &HeaderMap) -> bool {
    if uri.scheme_str() == Some("https") {
        return true;
    }
    headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|proto| proto.trim().eq_ignore_ascii_case("https"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::TokenPair;
    use axum::http::HeaderValue;

    fn cookies() -> SessionCookies {
        SessionCookies::from_config(&SessionConfig::default())
    }

    fn pair(access: &str, refresh: Option<&str>) -> TokenPair {
        TokenPair {
            access: BearerToken::new(access).unwrap(),
            refresh: refresh.and_then(BearerToken::new),
        }
    }

    #[test]
    fn store_sets_both_cookies_with_attributes() {
        let jar = cookies().apply(
            CookieJar::new(),
            &CookieUpdate::Store(pair("acc", Some("ref"))),
            true,
        );

        let access = jar.get("nen1090_access").unwrap();
        assert_eq!(access.value(), "acc");
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.secure(), Some(true));
        assert_eq!(access.same_site(), Some(SameSite::Lax));
        assert_eq!(access.path(), Some("/"));
        assert_eq!(jar.get("nen1090_refresh").unwrap().value(), "ref");
    }

    #[test]
    fn store_without_refresh_leaves_refresh_cookie_alone() {
        let jar = cookies().apply(CookieJar::new(), &CookieUpdate::Store(pair("acc", None)), false);
        assert!(jar.get("nen1090_refresh").is_none());
        assert_eq!(jar.get("nen1090_access").unwrap().secure(), Some(false));
    }

    #[test]
    fn clear_all_expires_three_cookies() {
        let jar = cookies().apply(CookieJar::new(), &CookieUpdate::ClearAll, false);
        for name in ["nen1090_access", "nen1090_refresh", "nen1090_token"] {
            let cookie = jar.get(name).unwrap();
            assert_eq!(cookie.value(), "");
            assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        }
    }

    #[test]
    fn configured_domain_is_applied() {
        let config = SessionConfig {
            cookie_domain: Some(".example.com".to_string()),
            ..SessionConfig::default()
        };
        let jar = SessionCookies::from_config(&config).apply(
            CookieJar::new(),
            &CookieUpdate::Store(pair("acc", None)),
            true,
        );
        assert_eq!(jar.get("nen1090_access").unwrap().domain(), Some("example.com"));
    }

    #[test]
    fn legacy_access_uses_fixed_lifetime() {
        let token = BearerToken::new("legacy").unwrap();
        let jar = cookies().legacy_access(CookieJar::new(), &token, false);
        let cookie = jar.get("nen1090_access").unwrap();
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604_800)));
    }

    #[test]
    fn session_reads_access_and_refresh() {
        let jar = CookieJar::new()
            .add(Cookie::new("nen1090_access", "a"))
            .add(Cookie::new("nen1090_refresh", "r"));
        let session = cookies().session(&jar);
        assert_eq!(session.access.unwrap().as_str(), "a");
        assert_eq!(session.refresh.unwrap().as_str(), "r");
    }

    #[test]
    fn secure_detection() {
        let https: Uri = "https://shop.example.com/api/x".parse().unwrap();
        assert!(is_secure_request(&https, &HeaderMap::new()));

        let plain: Uri = "/api/x".parse().unwrap();
        assert!(!is_secure_request(&plain, &HeaderMap::new()));

        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https, http"));
        assert!(is_secure_request(&plain, &headers));
    }
}
