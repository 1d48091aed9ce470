//! Semantic Response Cache
//!
//! Answers prompts from a bounded in-memory cache before calling a remote LLM:
//! - Exact hits on the normalized query text
//! - Similarity hits on the closest cached query embedding above a threshold
//! - Remote generation with retry and backoff on a miss, stored FIFO

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::anyhow;
use api::state::AppState;
use config::API_KEY_ENV;
use infrastructure::{
    cache::InMemoryCacheStore,
    embedding::HuggingFaceEmbeddingProvider,
    generation::{HuggingFaceGenerationClient, RetryingGenerationClient},
    llm::HttpClient,
    services::SemanticCacheService,
};
use tracing::info;

/// Create the application state from configuration
///
/// Fails when no HuggingFace API key is available or the cache settings are
/// invalid.
pub fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow!(
            "{} is missing. Set it in the environment or a .env file.",
            API_KEY_ENV
        )
    })?;

    let http_client = HttpClient::with_timeout(config.generation.request_timeout())?;

    let embedder = Arc::new(HuggingFaceEmbeddingProvider::with_url(
        http_client.clone(),
        &api_key,
        &config.embedding.api_url,
    ));

    let remote = Arc::new(HuggingFaceGenerationClient::with_url(
        http_client,
        &api_key,
        &config.generation.api_url,
    ));
    let generator = Arc::new(RetryingGenerationClient::new(
        remote,
        config.generation.retry_policy(),
    )?);

    let settings = config.cache.settings()?;
    let store = Arc::new(InMemoryCacheStore::new(settings.capacity)?);

    let service = SemanticCacheService::new(store, embedder, generator, settings)?
        .with_config(config.cache.service_config());

    info!(
        capacity = settings.capacity,
        similarity_threshold = settings.similarity_threshold,
        max_attempts = config.generation.max_attempts,
        "Semantic cache initialized"
    );

    Ok(AppState::new(Arc::new(service)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key() -> AppConfig {
        let mut config = AppConfig::default();
        config.generation.api_key = Some("hf_test".to_string());
        config
    }

    #[tokio::test]
    async fn test_create_app_state() {
        let state = create_app_state(&config_with_key()).unwrap();

        let stats = state.cache_service.stats().await.unwrap();
        assert_eq!(stats.capacity, 100);
        assert_eq!(stats.entries, 0);
    }

    #[test]
    fn test_invalid_cache_settings_rejected() {
        let mut config = config_with_key();
        config.cache.similarity_threshold = 1.5;

        assert!(create_app_state(&config).is_err());
    }

    #[test]
    fn test_invalid_retry_policy_rejected() {
        let mut config = config_with_key();
        config.generation.max_attempts = 0;

        assert!(create_app_state(&config).is_err());
    }
}
