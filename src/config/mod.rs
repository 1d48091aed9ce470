//! Application configuration loaded from `config/` files and `APP__` variables

mod app_config;

pub use app_config::{
    AppConfig, CacheConfig, EmbeddingConfig, GenerationConfig, LogFormat, LoggingConfig,
    ServerConfig, API_KEY_ENV,
};
