//! HTTP handlers for session endpoints and generic API forwarding.

use axum::{
    body::to_bytes,
    extract::{Query, Request, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use crate::adapters::http::error::GatewayApiError;
use crate::adapters::http::relay::{relay, upstream_request, MAX_BODY_BYTES};
use crate::adapters::http::router::GatewayAppState;
use crate::application::handlers::session::{
    ForwardCommand, GetIdentityQuery, LoginCommand, LogoutCommand, RefreshSessionCommand,
};
use crate::domain::session::{BearerToken, CookieUpdate};

use super::cookies::is_secure_request;
use super::dto::{LegacyAuthQuery, RefreshRequest, RefreshResponse};

pub const DEFAULT_NEXT_PATH: &str = "/app/dashboard.html";
pub const LOGIN_PAGE: &str = "/app/login.html";

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/auth/login - Forward login, then store the returned tokens
pub async fn login(
    State(state): State<GatewayAppState>,
    jar: CookieJar,
    request: Request,
) -> Result<Response, GatewayApiError> {
    let secure = is_secure_request(request.uri(), request.headers());
    let cmd = LoginCommand {
        request: upstream_request(request).await?,
    };

    let result = state.login_handler().handle(cmd).await?;
    let jar = state.cookies().apply(jar, &result.cookies, secure);
    Ok((jar, relay(result.response)).into_response())
}

/// POST /api/v1/auth/refresh - Exchange the refresh token for a new pair
pub async fn refresh(
    State(state): State<GatewayAppState>,
    jar: CookieJar,
    request: Request,
) -> Result<Response, GatewayApiError> {
    let secure = is_secure_request(request.uri(), request.headers());
    let body = to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .unwrap_or_default();
    let body: RefreshRequest = serde_json::from_slice(&body).unwrap_or_default();

    let cookies = state.cookies();
    let cmd = RefreshSessionCommand {
        body_token: body.refresh_token.and_then(BearerToken::new),
        cookie_token: cookies.session(&jar).refresh,
    };

    let pair = state.refresh_handler().handle(cmd).await?;
    let response = RefreshResponse::from(&pair);
    let jar = cookies.apply(jar, &CookieUpdate::Store(pair), secure);
    Ok((jar, Json(response)).into_response())
}

/// ANY /api/v1/auth/logout - Clear session cookies
pub async fn logout(
    State(state): State<GatewayAppState>,
    jar: CookieJar,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let jar = clear_session(&state, jar, &uri, &headers);
    (jar, Json(json!({ "ok": true }))).into_response()
}

/// GET /logout - Clear session cookies and return to the home page
pub async fn logout_redirect(
    State(state): State<GatewayAppState>,
    jar: CookieJar,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let jar = clear_session(&state, jar, &uri, &headers);
    (jar, found("/")).into_response()
}

fn clear_session(state: &GatewayAppState, jar: CookieJar, uri: &Uri, headers: &HeaderMap) -> CookieJar {
    let cookies = state.cookies();
    let result = state.logout_handler().handle(LogoutCommand {
        session: cookies.session(&jar),
    });
    tracing::debug!(was_authenticated = result.was_authenticated, "Session cleared");
    cookies.apply(jar, &result.cookies, is_secure_request(uri, headers))
}

/// GET /api/auth/me - Current identity
pub async fn me(
    State(state): State<GatewayAppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Response, GatewayApiError> {
    let query = GetIdentityQuery {
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        access_cookie: state.cookies().access_token(&jar),
    };

    let result = state.identity_handler().handle(query).await?;
    Ok((
        result.status,
        [(header::CACHE_CONTROL, "no-store")],
        Json(result.body),
    )
        .into_response())
}

/// GET /auth?token=&next= - Legacy token-in-URL bridge
pub async fn legacy_auth(
    State(state): State<GatewayAppState>,
    jar: CookieJar,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<LegacyAuthQuery>,
) -> Response {
    let next = safe_next_path(query.next.as_deref());

    let Some(token) = query.token.and_then(BearerToken::new) else {
        let encoded: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
        return found(&format!("{}?next={}", LOGIN_PAGE, encoded));
    };

    let jar = state
        .cookies()
        .legacy_access(jar, &token, is_secure_request(&uri, &headers));
    (jar, found(next)).into_response()
}

/// Fallback for `/api/*` - Forward to the backend with refresh-and-retry
pub async fn forward_api(
    State(state): State<GatewayAppState>,
    jar: CookieJar,
    request: Request,
) -> Result<Response, GatewayApiError> {
    let path = request.uri().path();
    if path != "/api" && !path.starts_with("/api/") {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let secure = is_secure_request(request.uri(), request.headers());
    let cookies = state.cookies();
    let cmd = ForwardCommand {
        session: cookies.session(&jar),
        request: upstream_request(request).await?,
    };

    let result = state.forward_handler().handle(cmd).await?;
    let jar = cookies.apply(jar, &result.cookies, secure);
    Ok((jar, relay(result.response)).into_response())
}

// ════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════

/// Only same-site absolute paths are accepted as redirect targets.
pub fn safe_next_path(next: Option<&str>) -> &str {
    match next.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path
        }
        _ => DEFAULT_NEXT_PATH,
    }
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
