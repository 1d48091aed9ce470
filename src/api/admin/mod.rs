//! Admin API endpoints for inspecting and tuning the cache

pub mod cache;

use axum::{
    routing::{delete, get, put},
    Router,
};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/cache", delete(cache::clear_cache))
        .route("/cache/stats", get(cache::get_stats))
        .route("/cache/history", get(cache::get_history))
        .route("/cache/config", put(cache::configure_cache))
}
