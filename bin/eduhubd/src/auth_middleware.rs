//! Cookie authentication middleware + admin role checking.
//!
//! Extracts the signed token from the `token` cookie, verifies it, and
//! provides `Claims` to downstream handlers. The admin middleware re-reads
//! the caller's role from the user collection on every request, so a role
//! change takes effect on the very next request even though previously
//! issued tokens stay valid.

use axum::Json;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::routes::AppState;
use crate::token::Claims;

/// Name of the session cookie.
pub const TOKEN_COOKIE: &str = "token";

/// Role value gating admin-only routes.
pub const ADMIN_ROLE: &str = "admin";

/// Error type for authentication / authorization failures.
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken(String),
    Forbidden,
    Storage(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
            AuthError::InvalidToken(e) => (StatusCode::FORBIDDEN, format!("forbidden: {}", e)),
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "forbidden".to_string()),
            AuthError::Storage(e) => {
                tracing::error!("auth role lookup failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "storage error".to_string())
            }
        };
        (status, Json(json!({ "message": msg }))).into_response()
    }
}

/// Middleware that authenticates the request via the `token` cookie.
///
/// A missing cookie is the normal unauthenticated case (401). A cookie
/// that fails verification — bad signature, malformed, expired — is 403.
/// On success the decoded claims are stored in request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = cookie_value(&request, TOKEN_COOKIE).ok_or(AuthError::MissingToken)?;

    let claims = state
        .tokens
        .verify(&token)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Middleware that requires the authenticated caller to be an admin.
///
/// Runs after `require_auth`; missing claims or a claims payload without
/// an email are treated as forbidden. Exactly one store read per request,
/// no caching.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let email = request
        .extensions()
        .get::<Claims>()
        .and_then(|claims| claims.email.clone())
        .ok_or(AuthError::Forbidden)?;

    let user = state
        .store
        .find_one("user", "email", &email)
        .map_err(|e| AuthError::Storage(e.to_string()))?;

    let is_admin = user
        .as_ref()
        .and_then(|u| u.get("role"))
        .and_then(|r| r.as_str())
        == Some(ADMIN_ROLE);

    if !is_admin {
        return Err(AuthError::Forbidden);
    }
    Ok(next.run(request).await)
}

/// Extract a cookie value from the request's Cookie header.
fn cookie_value(request: &Request, name: &str) -> Option<String> {
    let header = request.headers().get(header::COOKIE)?.to_str().ok()?;
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_cookie(cookie: &str) -> Request {
        axum::http::Request::builder()
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_cookie_value_single() {
        let req = request_with_cookie("token=abc123");
        assert_eq!(cookie_value(&req, "token").as_deref(), Some("abc123"));
    }

    #[test]
    fn test_cookie_value_among_others() {
        let req = request_with_cookie("theme=dark; token=abc123; lang=en");
        assert_eq!(cookie_value(&req, "token").as_deref(), Some("abc123"));
    }

    #[test]
    fn test_cookie_value_absent() {
        let req = request_with_cookie("theme=dark");
        assert!(cookie_value(&req, "token").is_none());

        let no_header = axum::http::Request::builder().body(Body::empty()).unwrap();
        assert!(cookie_value(&no_header, "token").is_none());
    }

    #[test]
    fn test_cookie_value_does_not_match_prefix() {
        let req = request_with_cookie("tokenish=zzz");
        assert!(cookie_value(&req, "token").is_none());
    }
}
