use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use eduhub_store::InsertAck;

use crate::error::ApiError;
use crate::routes::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/blog", get(list_posts).post(create_post))
        .route("/blog/{id}", get(get_post))
}

async fn create_post(
    State(state): State<AppState>,
    Json(doc): Json<Value>,
) -> Result<Json<InsertAck>, ApiError> {
    let ack = state.store.insert("blog", doc)?;
    Ok(Json(ack))
}

async fn list_posts(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let items = state.store.list("blog")?;
    Ok(Json(Value::Array(items)))
}

async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let doc = state.store.get("blog", &id)?;
    Ok(Json(doc.unwrap_or(Value::Null)))
}
