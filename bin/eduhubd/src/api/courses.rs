use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use eduhub_store::InsertAck;

use crate::error::ApiError;
use crate::routes::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/{id}", get(get_course))
}

async fn create_course(
    State(state): State<AppState>,
    Json(doc): Json<Value>,
) -> Result<Json<InsertAck>, ApiError> {
    let ack = state.store.insert("course", doc)?;
    Ok(Json(ack))
}

async fn list_courses(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let items = state.store.list("course")?;
    Ok(Json(Value::Array(items)))
}

/// Absent course is JSON null, not 404.
async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let doc = state.store.get("course", &id)?;
    Ok(Json(doc.unwrap_or(Value::Null)))
}
