//! Client address resolution for rate limiting and captcha checks.
//!
//! The gateway runs behind a CDN or reverse proxy, so forwarded headers are
//! preferred over the socket address. Lookup order:
//! 1. `CF-Connecting-IP`
//! 2. `X-Forwarded-For` (first entry, the original client)
//! 3. `X-Real-IP`
//! 4. The peer address from `ConnectInfo`
//!
//! When none is available every caller shares the `0.0.0.0` bucket.
//!
//! Forwarded headers are client-controlled unless a proxy overwrites them.
//! With `server.trust_forwarded_headers = false` only the peer address is
//! used, and the router publishes that choice as a [`ForwardedHeaders`]
//! request extension.

use std::convert::Infallible;
use std::net::SocketAddr;

use async_trait::async_trait;
use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};

pub const UNKNOWN_CLIENT_IP: &str = "0.0.0.0";

/// Whether forwarded headers are trusted; trusted when the extension is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardedHeaders {
    pub trusted: bool,
}

impl Default for ForwardedHeaders {
    fn default() -> Self {
        Self { trusted: true }
    }
}

/// Client address of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let connect_info = parts.extensions.get::<ConnectInfo<SocketAddr>>();
        let policy = parts
            .extensions
            .get::<ForwardedHeaders>()
            .copied()
            .unwrap_or_default();
        Ok(ClientIp(extract_client_ip(&parts.headers, connect_info, policy)))
    }
}

pub fn extract_client_ip(
    headers: &HeaderMap,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
    policy: ForwardedHeaders,
) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .filter(|_| policy.trusted)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(ip) = header("CF-Connecting-IP") {
        return ip.to_string();
    }

    if let Some(first_ip) = header("X-Forwarded-For")
        .and_then(|forwarded| forwarded.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return first_ip.to_string();
    }

    if let Some(ip) = header("X-Real-IP") {
        return ip.to_string();
    }

    connect_info
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT_IP.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const TRUSTED: ForwardedHeaders = ForwardedHeaders { trusted: true };

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn cf_connecting_ip_wins() {
        let map = headers(&[
            ("cf-connecting-ip", "203.0.113.9"),
            ("x-forwarded-for", "1.2.3.4"),
        ]);
        assert_eq!(extract_client_ip(&map, None, TRUSTED), "203.0.113.9");
    }

    #[test]
    fn first_forwarded_for_entry_is_used() {
        let map = headers(&[("x-forwarded-for", "1.2.3.4, 5.6.7.8")]);
        assert_eq!(extract_client_ip(&map, None, TRUSTED), "1.2.3.4");
    }

    #[test]
    fn real_ip_before_socket() {
        let map = headers(&[("x-real-ip", "9.8.7.6")]);
        let peer = ConnectInfo(SocketAddr::from(([10, 0, 0, 1], 443)));
        assert_eq!(extract_client_ip(&map, Some(&peer), TRUSTED), "9.8.7.6");
    }

    #[test]
    fn socket_address_fallback() {
        let peer = ConnectInfo(SocketAddr::from(([10, 0, 0, 1], 443)));
        assert_eq!(extract_client_ip(&HeaderMap::new(), Some(&peer), TRUSTED), "10.0.0.1");
    }

    #[test]
    fn unknown_without_any_source() {
        assert_eq!(extract_client_ip(&HeaderMap::new(), None, TRUSTED), UNKNOWN_CLIENT_IP);
    }

    #[test]
    fn untrusted_headers_fall_back_to_peer() {
        let map = headers(&[
            ("cf-connecting-ip", "203.0.113.9"),
            ("x-forwarded-for", "1.2.3.4"),
            ("x-real-ip", "9.8.7.6"),
        ]);
        let peer = ConnectInfo(SocketAddr::from(([10, 0, 0, 1], 443)));
        let policy = ForwardedHeaders { trusted: false };
        assert_eq!(extract_client_ip(&map, Some(&peer), policy), "10.0.0.1");
        assert_eq!(extract_client_ip(&map, None, policy), UNKNOWN_CLIENT_IP);
    }
}
