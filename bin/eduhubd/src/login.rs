//! Session endpoints — issue the token cookie on login, clear it on logout.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::auth_middleware::TOKEN_COOKIE;
use crate::error::ApiError;
use crate::routes::AppState;

/// Login request body: the web client sends the user it just signed in.
#[derive(Debug, Deserialize)]
struct JwtRequest {
    user: Map<String, Value>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/jwt", post(issue_jwt))
        .route("/logout", post(logout))
}

/// POST /jwt — sign the user payload and set it as the session cookie.
async fn issue_jwt(
    State(state): State<AppState>,
    Json(body): Json<JwtRequest>,
) -> Result<Response, ApiError> {
    let token = state
        .tokens
        .issue(body.user)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let cookie = session_cookie(&token, state.tokens.ttl_secs());
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "success": true })),
    )
        .into_response())
}

/// POST /logout — clear the session cookie. Nothing is invalidated
/// server-side; the cookie is the only copy of the token.
async fn logout() -> Response {
    (
        [(header::SET_COOKIE, clear_cookie())],
        Json(json!({ "message": "logged out" })),
    )
        .into_response()
}

/// Format the session cookie. HttpOnly keeps the token out of client
/// script; SameSite=Strict keeps it off cross-site requests.
fn session_cookie(token: &str, max_age: i64) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Strict",
        TOKEN_COOKIE, token, max_age
    )
}

/// An empty value with an epoch expiry deletes the cookie.
fn clear_cookie() -> String {
    format!(
        "{}=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; SameSite=Strict",
        TOKEN_COOKIE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc123", 86_400);
        assert!(cookie.starts_with("token=abc123;"));
        assert!(cookie.contains("Max-Age=86400"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
    }

    #[test]
    fn test_clear_cookie_expires_at_epoch() {
        let cookie = clear_cookie();
        assert!(cookie.starts_with("token=;"));
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970"));
        assert!(cookie.contains("HttpOnly"));
    }
}
