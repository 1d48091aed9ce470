use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::admin;
use super::health;
use super::state::AppState;
use super::types::ApiError;
use super::v1;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Query API
        .nest("/v1", v1::create_v1_router())
        // Cache administration
        .nest("/admin", admin::create_admin_router())
        .fallback(|| async { ApiError::not_found("No such endpoint") })
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
