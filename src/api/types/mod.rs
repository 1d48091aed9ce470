//! API request, response and error types

pub mod cache;
pub mod error;
pub mod json;

pub use cache::{
    ConfigureCacheRequest, ConfigureCacheResponse, HistoryParams, HistoryResponse, QueryRequest,
    QueryResponse,
};
pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
