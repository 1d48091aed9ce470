//! Cached query endpoint

use axum::extract::State;
use tracing::info;
use uuid::Uuid;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, QueryRequest, QueryResponse};

/// POST /v1/query
///
/// Every tagged outcome is a 200, including `error`; only an unreadable
/// request body is rejected.
pub async fn submit_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let request_id = Uuid::new_v4().to_string();

    info!(
        request_id = %request_id,
        query_len = request.query.len(),
        "Processing cache query"
    );

    let outcome = state.cache_service.query(&request.query).await;

    info!(
        request_id = %request_id,
        provenance = %outcome.provenance,
        time_ms = outcome.time_millis,
        "Cache query completed"
    );

    Ok(Json(QueryResponse {
        request_id,
        outcome,
    }))
}
