//! Session cookie configuration

use serde::Deserialize;

/// Cookie names and attributes for the browser session.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_access_cookie")]
    pub access_cookie: String,

    #[serde(default = "default_refresh_cookie")]
    pub refresh_cookie: String,

    /// Pre-refresh-token cookie name, only ever cleared
    #[serde(default = "default_legacy_cookie")]
    pub legacy_cookie: String,

    /// Optional `Domain` attribute
    pub cookie_domain: Option<String>,

    /// Lifetime of the cookie set by the legacy `/auth` bridge
    #[serde(default = "default_legacy_max_age")]
    pub legacy_max_age_secs: i64,
}

impl SessionConfig {
    /// Cookie domain, ignoring blank values.
    pub fn cookie_domain(&self) -> Option<&str> {
        self.cookie_domain
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            access_cookie: default_access_cookie(),
            refresh_cookie: default_refresh_cookie(),
            legacy_cookie: default_legacy_cookie(),
            cookie_domain: None,
            legacy_max_age_secs: default_legacy_max_age(),
        }
    }
}

fn default_access_cookie() -> String {
    "nen1090_access".to_string()
}

fn default_refresh_cookie() -> String {
    "nen1090_refresh".to_string()
}

fn default_legacy_cookie() -> String {
    "nen1090_token".to_string()
}

fn default_legacy_max_age() -> i64 {
    604_800
}
