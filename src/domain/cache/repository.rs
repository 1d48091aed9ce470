//! Cache store trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::CacheEntry;
use crate::domain::similarity::SimilarityCandidate;
use crate::domain::DomainError;

/// Bounded key → entry store with FIFO-by-insertion eviction
///
/// Every method taking a key normalizes it first. A missing key is `Ok(None)`.
#[async_trait]
pub trait CacheStore: Send + Sync + Debug {
    /// Look up an entry by key
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, DomainError>;

    /// Look up the embedding stored for a key
    async fn get_embedding(&self, key: &str) -> Result<Option<Vec<f32>>, DomainError>;

    /// Insert or overwrite an entry, evicting the oldest one first when a new
    /// key would exceed capacity. Returns the evicted key, if any.
    async fn put(
        &self,
        key: &str,
        response: String,
        embedding: Option<Vec<f32>>,
    ) -> Result<Option<String>, DomainError>;

    /// Remove the oldest entry. Returns its key, or `None` on an empty store.
    async fn evict_one(&self) -> Result<Option<String>, DomainError>;

    /// Remove all entries
    async fn clear(&self) -> Result<(), DomainError>;

    /// Snapshot of entries with embeddings, oldest insertion first
    async fn candidates(&self) -> Result<Vec<SimilarityCandidate>, DomainError>;

    /// Current number of entries
    async fn size(&self) -> Result<usize, DomainError>;

    /// Configured maximum number of entries
    fn capacity(&self) -> usize;

    /// Change the capacity, evicting oldest entries until the store fits.
    /// Returns the evicted keys in eviction order.
    async fn set_capacity(&self, capacity: usize) -> Result<Vec<String>, DomainError>;

    /// Total number of evictions since creation or the last clear
    fn evictions(&self) -> u64;
}
