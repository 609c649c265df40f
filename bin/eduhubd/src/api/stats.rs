use axum::extract::State;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::auth_middleware::{require_admin, require_auth};
use crate::error::ApiError;
use crate::routes::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin-status", get(collection_counts))
        .route_layer(from_fn_with_state(state.clone(), require_admin))
        .route_layer(from_fn_with_state(state, require_auth))
}

/// GET /admin-status — per-collection document counts for the dashboard.
/// Each count is an independent read; the snapshot is not transactional.
async fn collection_counts(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let apply_count = state.store.count("apply")?;
    let blog_count = state.store.count("blog")?;
    let user_count = state.store.count("user")?;
    let event_count = state.store.count("event")?;
    let course_count = state.store.count("course")?;
    let announcement_count = state.store.count("announcements")?;

    Ok(Json(json!({
        "applyCount": apply_count,
        "blogCount": blog_count,
        "userCount": user_count,
        "eventCount": event_count,
        "courseCount": course_count,
        "announcementCount": announcement_count,
    })))
}
