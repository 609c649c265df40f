use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use crate::error::ApiError;
use crate::routes::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events/{id}", get(get_event))
}

async fn list_events(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let items = state.store.list("event")?;
    Ok(Json(Value::Array(items)))
}

async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let doc = state.store.get("event", &id)?;
    Ok(Json(doc.unwrap_or(Value::Null)))
}
