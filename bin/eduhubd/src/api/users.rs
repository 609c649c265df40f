use axum::extract::{Extension, Path, State};
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde_json::{Value, json};

use eduhub_store::{DeleteAck, UpdateAck};

use crate::auth_middleware::{ADMIN_ROLE, require_admin, require_auth};
use crate::error::ApiError;
use crate::routes::AppState;
use crate::token::Claims;

pub fn routes(state: AppState) -> Router<AppState> {
    // Delete and promote were unguarded upstream; that was an oversight,
    // every other mutating admin surface requires the admin role.
    let admin_only = Router::new()
        .route("/user", get(list_users))
        .route("/user/{id}", delete(remove_user).patch(promote_user))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/user/{id}", get(admin_flag))
        .merge(admin_only)
        .route_layer(from_fn_with_state(state, require_auth))
}

/// GET /user — full user list (admin only).
async fn list_users(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let items = state.store.list("user")?;
    Ok(Json(Value::Array(items)))
}

/// GET /user/{id} — whether the authenticated caller is an admin.
/// The check is by the caller's own email, matching the web client
/// contract; the path id is not consulted.
async fn admin_flag(
    State(state): State<AppState>,
    Path(_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Value>, ApiError> {
    let email = claims.email.as_deref().ok_or(ApiError::Unauthorized)?;

    let user = state.store.find_one("user", "email", email)?;
    let admin = user
        .as_ref()
        .and_then(|u| u.get("role"))
        .and_then(|r| r.as_str())
        == Some(ADMIN_ROLE);

    Ok(Json(json!({ "admin": admin })))
}

/// DELETE /user/{id} — remove one user record.
async fn remove_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, ApiError> {
    let ack = state.store.delete("user", &id)?;
    Ok(Json(ack))
}

/// PATCH /user/{id} — promote to admin. Idempotent: repeating the call
/// leaves role = "admin" with no error.
async fn promote_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateAck>, ApiError> {
    let ack = state
        .store
        .set_field("user", &id, "role", json!(ADMIN_ROLE))?;
    Ok(Json(ack))
}
