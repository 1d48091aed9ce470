//! Cache statistics, history and configuration endpoints

use axum::extract::{Query, State};
use axum::http::StatusCode;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, ConfigureCacheRequest, ConfigureCacheResponse, HistoryParams, HistoryResponse, Json,
};
use crate::domain::CacheStats;

/// GET /admin/cache/stats
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<CacheStats>, ApiError> {
    let stats = state.cache_service.stats().await?;

    Ok(Json(stats))
}

/// GET /admin/cache/history?limit=N
pub async fn get_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let records = state.cache_service.history(params.limit())?;

    Ok(Json(HistoryResponse { records }))
}

/// DELETE /admin/cache
pub async fn clear_cache(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.cache_service.clear().await?;

    info!("Cache cleared via admin API");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /admin/cache/config
pub async fn configure_cache(
    State(state): State<AppState>,
    Json(request): Json<ConfigureCacheRequest>,
) -> Result<Json<ConfigureCacheResponse>, ApiError> {
    let settings = state
        .cache_service
        .configure(request.capacity, request.similarity_threshold)
        .await?;

    Ok(Json(ConfigureCacheResponse { settings }))
}
