//! Domain layer - core types, traits and invariants

pub mod cache;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod query;
pub mod similarity;

pub use cache::{normalize_key, CacheEntry, CacheKey, CacheSettings, CacheStore};
pub use embedding::EmbeddingProvider;
pub use error::DomainError;
pub use generation::{GenerationClient, RetryPolicy};
pub use query::{CacheStats, Provenance, QueryError, QueryErrorKind, QueryOutcome, QueryRecord};
pub use similarity::{
    cosine_similarity, find_best_match, LinearScanEngine, SimilarityCandidate, SimilarityEngine,
    SimilarityMatch,
};
