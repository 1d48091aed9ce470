//! Embedding provider implementations

mod huggingface;

pub use huggingface::{HuggingFaceEmbeddingProvider, DEFAULT_EMBEDDING_URL};

// Re-export HTTP client for use by embedding providers
pub use super::llm::{HttpClient, HttpClientTrait};
