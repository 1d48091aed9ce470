//! In-memory cache store with FIFO-by-insertion eviction

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::cache::{validate_capacity, CacheEntry, CacheKey, CacheStore};
use crate::domain::similarity::SimilarityCandidate;
use crate::domain::DomainError;
use crate::infrastructure::observability::record_eviction;

#[derive(Debug, Default)]
struct StoreState {
    entries: HashMap<String, CacheEntry>,
    next_sequence: u64,
}

/// Memory-resident cache store
///
/// All mutations run under a single write lock, so evict-then-insert is atomic
/// with respect to other writers. Reads never refresh an entry's age.
#[derive(Debug)]
pub struct InMemoryCacheStore {
    state: RwLock<StoreState>,
    // Only changed while holding the write lock
    capacity: AtomicUsize,
    evictions: AtomicU64,
}

impl InMemoryCacheStore {
    /// Create a new store; `capacity` must be at least 1
    pub fn new(capacity: usize) -> Result<Self, DomainError> {
        validate_capacity(capacity)?;

        Ok(Self {
            state: RwLock::new(StoreState::default()),
            capacity: AtomicUsize::new(capacity),
            evictions: AtomicU64::new(0),
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, DomainError> {
        self.state
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, DomainError> {
        self.state
            .write()
            .map_err(|e| DomainError::internal(format!("Failed to acquire write lock: {}", e)))
    }

    /// Remove the entry with the oldest insertion, ties broken by sequence
    fn evict_oldest(&self, entries: &mut HashMap<String, CacheEntry>) -> Option<String> {
        let oldest_key = entries
            .values()
            .min_by_key(|entry| entry.age_rank())
            .map(|entry| entry.key().as_str().to_string())?;

        entries.remove(&oldest_key);
        self.evictions.fetch_add(1, Ordering::Relaxed);
        record_eviction();
        debug!(key = %oldest_key, "Evicted oldest cache entry");

        Some(oldest_key)
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, DomainError> {
        let key = CacheKey::normalize(key);
        let state = self.read()?;

        Ok(state.entries.get(key.as_str()).cloned())
    }

    async fn get_embedding(&self, key: &str) -> Result<Option<Vec<f32>>, DomainError> {
        let key = CacheKey::normalize(key);
        let state = self.read()?;

        Ok(state
            .entries
            .get(key.as_str())
            .and_then(|entry| entry.embedding().map(<[f32]>::to_vec)))
    }

    async fn put(
        &self,
        key: &str,
        response: String,
        embedding: Option<Vec<f32>>,
    ) -> Result<Option<String>, DomainError> {
        let key = CacheKey::normalize(key);
        let mut state = self.write()?;
        let capacity = self.capacity.load(Ordering::Acquire);

        // Overwriting an existing key never pushes anything else out
        let evicted = if !state.entries.contains_key(key.as_str())
            && state.entries.len() >= capacity
        {
            self.evict_oldest(&mut state.entries)
        } else {
            None
        };

        let sequence = state.next_sequence;
        state.next_sequence += 1;

        let entry = CacheEntry::new(key.clone(), response, embedding, sequence);
        state.entries.insert(key.into_inner(), entry);

        Ok(evicted)
    }

    async fn evict_one(&self) -> Result<Option<String>, DomainError> {
        let mut state = self.write()?;

        Ok(self.evict_oldest(&mut state.entries))
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut state = self.write()?;

        state.entries.clear();
        self.evictions.store(0, Ordering::Relaxed);

        Ok(())
    }

    async fn candidates(&self) -> Result<Vec<SimilarityCandidate>, DomainError> {
        let state = self.read()?;

        let mut ordered: Vec<&CacheEntry> = state
            .entries
            .values()
            .filter(|entry| entry.embedding().is_some())
            .collect();
        ordered.sort_by_key(|entry| entry.sequence());

        Ok(ordered
            .into_iter()
            .filter_map(|entry| {
                entry
                    .embedding()
                    .map(|v| SimilarityCandidate::new(entry.key().as_str(), v.to_vec()))
            })
            .collect())
    }

    async fn size(&self) -> Result<usize, DomainError> {
        Ok(self.read()?.entries.len())
    }

    fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Acquire)
    }

    async fn set_capacity(&self, capacity: usize) -> Result<Vec<String>, DomainError> {
        validate_capacity(capacity)?;

        let mut state = self.write()?;
        self.capacity.store(capacity, Ordering::Release);

        let mut evicted = Vec::new();

        while state.entries.len() > capacity {
            match self.evict_oldest(&mut state.entries) {
                Some(key) => evicted.push(key),
                None => break,
            }
        }

        Ok(evicted)
    }

    fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }
}
