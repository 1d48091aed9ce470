//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::SemanticCacheService;

/// Application state shared by all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub cache_service: Arc<SemanticCacheService>,
}

impl AppState {
    pub fn new(cache_service: Arc<SemanticCacheService>) -> Self {
        Self { cache_service }
    }
}
