//! Cached response entry

use std::time::Instant;

use super::CacheKey;

/// A cached response and the embedding of the query that produced it
#[derive(Debug, Clone)]
pub struct CacheEntry {
    key: CacheKey,
    response: String,
    embedding: Option<Vec<f32>>,
    created_at: Instant,
    /// Strictly increasing insertion sequence, breaks `created_at` ties
    sequence: u64,
}

impl CacheEntry {
    pub fn new(
        key: CacheKey,
        response: impl Into<String>,
        embedding: Option<Vec<f32>>,
        sequence: u64,
    ) -> Self {
        Self {
            key,
            response: response.into(),
            embedding,
            created_at: Instant::now(),
            sequence,
        }
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn embedding(&self) -> Option<&[f32]> {
        self.embedding.as_deref()
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Ordering used for eviction: oldest insertion first
    pub fn age_rank(&self) -> (Instant, u64) {
        (self.created_at, self.sequence)
    }
}
