//! Request and response bodies for the query and cache admin endpoints

use serde::{Deserialize, Serialize};

use crate::domain::{CacheSettings, QueryOutcome, QueryRecord};

#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Query outcome tagged with the request id
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub request_id: String,
    #[serde(flatten)]
    pub outcome: QueryOutcome,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<usize>,
}

impl HistoryParams {
    pub const DEFAULT_LIMIT: usize = 5;

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub records: Vec<QueryRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigureCacheRequest {
    pub capacity: usize,
    pub similarity_threshold: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigureCacheResponse {
    pub settings: CacheSettings,
}
