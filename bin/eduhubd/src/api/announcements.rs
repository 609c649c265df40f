use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use eduhub_store::InsertAck;

use crate::error::ApiError;
use crate::routes::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/announcements",
        get(list_announcements).post(create_announcement),
    )
}

async fn list_announcements(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let items = state.store.list("announcements")?;
    Ok(Json(Value::Array(items)))
}

async fn create_announcement(
    State(state): State<AppState>,
    Json(doc): Json<Value>,
) -> Result<Json<InsertAck>, ApiError> {
    let ack = state.store.insert("announcements", doc)?;
    Ok(Json(ack))
}
