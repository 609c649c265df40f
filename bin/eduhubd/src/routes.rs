//! Route registration — resource routers + system endpoints.

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::response::IntoResponse;
use axum::routing::get;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use eduhub_store::DocStore;

use crate::api;
use crate::config::ServerConfig;
use crate::login;
use crate::token::TokenService;

/// Application shared state — process-wide resources initialized once at
/// startup and injected into every middleware and handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: Arc<dyn DocStore>,
    pub tokens: Arc<TokenService>,
}

/// Build the complete router with all routes.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/version", get(version))
        .merge(login::routes())
        .merge(api::courses::routes())
        .merge(api::events::routes())
        .merge(api::blog::routes())
        .merge(api::announcements::routes())
        .merge(api::users::routes(state.clone()))
        .merge(api::apply::routes(state.clone()))
        .merge(api::stats::routes(state.clone()))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// CORS for the web client: fixed origin allow-list, credentials enabled
/// so the browser sends the token cookie.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut origins: Vec<HeaderValue> = Vec::new();
    for origin in &config.cors.origins {
        match origin.parse() {
            Ok(value) => origins.push(value),
            Err(_) => tracing::warn!("ignoring invalid CORS origin: {}", origin),
        }
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

async fn index() -> impl IntoResponse {
    "Welcome to eduhub!"
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "eduhubd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
