use std::time::Duration;

use serde::Deserialize;

use crate::domain::{CacheSettings, DomainError, RetryPolicy};
use crate::infrastructure::embedding::DEFAULT_EMBEDDING_URL;
use crate::infrastructure::generation::DEFAULT_GENERATION_URL;
use crate::infrastructure::observability::MetricsConfig;
use crate::infrastructure::services::SemanticCacheServiceConfig;

/// Environment variable holding the HuggingFace access token
pub const API_KEY_ENV: &str = "HUGGINGFACE_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub capacity: usize,
    pub similarity_threshold: f32,
    pub query_timeout_secs: u64,
    pub history_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub api_url: String,
    /// Used only when `HUGGINGFACE_API_KEY` is unset
    pub api_key: Option<String>,
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub api_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        let settings = CacheSettings::default();

        Self {
            capacity: settings.capacity,
            similarity_threshold: settings.similarity_threshold,
            query_timeout_secs: 120,
            history_size: 50,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();

        Self {
            api_url: DEFAULT_GENERATION_URL.to_string(),
            api_key: None,
            max_attempts: policy.max_attempts,
            initial_delay_ms: policy.initial_delay_ms,
            max_delay_ms: policy.max_delay_ms,
            request_timeout_secs: 60,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_EMBEDDING_URL.to_string(),
        }
    }
}

impl CacheConfig {
    pub fn settings(&self) -> Result<CacheSettings, DomainError> {
        CacheSettings::new(self.capacity, self.similarity_threshold)
    }

    pub fn service_config(&self) -> SemanticCacheServiceConfig {
        SemanticCacheServiceConfig {
            query_timeout: Duration::from_secs(self.query_timeout_secs),
            history_size: self.history_size,
        }
    }
}

impl GenerationConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts)
            .with_initial_delay(self.initial_delay_ms)
            .with_max_delay(self.max_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// HuggingFace token from the environment, falling back to the config file
    pub fn api_key(&self) -> Option<String> {
        resolve_api_key(
            std::env::var(API_KEY_ENV).ok(),
            self.generation.api_key.as_deref(),
        )
    }
}

fn resolve_api_key(from_env: Option<String>, configured: Option<&str>) -> Option<String> {
    from_env
        .filter(|key| !key.trim().is_empty())
        .or_else(|| {
            configured
                .filter(|key| !key.trim().is_empty())
                .map(str::to_string)
        })
}
