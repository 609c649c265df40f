use axum::extract::{Extension, Query, State};
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use crate::auth_middleware::{require_admin, require_auth};
use crate::error::ApiError;
use crate::routes::AppState;
use crate::token::Claims;

pub fn routes(state: AppState) -> Router<AppState> {
    let admin_only = Router::new()
        .route("/adminapply", get(all_applications))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/apply", get(my_applications))
        .merge(admin_only)
        .route_layer(from_fn_with_state(state, require_auth))
}

#[derive(Debug, Deserialize)]
struct ApplyQuery {
    email: String,
}

/// GET /apply?email=X — ownership-scoped: the caller may only list their
/// own applications, whether or not any exist for the requested email.
async fn my_applications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ApplyQuery>,
) -> Result<Json<Value>, ApiError> {
    let owner = claims.email.as_deref().ok_or(ApiError::Forbidden)?;
    if owner != query.email {
        return Err(ApiError::Forbidden);
    }

    let items = state.store.find("apply", "email", &query.email)?;
    Ok(Json(Value::Array(items)))
}

/// GET /adminapply — every application, for the admin dashboard.
async fn all_applications(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let items = state.store.list("apply")?;
    Ok(Json(Value::Array(items)))
}
