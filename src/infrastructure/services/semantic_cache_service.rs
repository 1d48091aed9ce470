//! Semantic response caching service
//!
//! Answers a query from the exact-match cache, then from the closest cached
//! query by embedding similarity, and only then from the remote generation
//! endpoint. Generated answers are stored; failures never are.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::similarity::{magnitude, LinearScanEngine, SimilarityEngine};
use crate::domain::{
    CacheKey, CacheSettings, CacheStats, CacheStore, DomainError, EmbeddingProvider,
    GenerationClient, Provenance, QueryOutcome, QueryRecord,
};
use crate::infrastructure::observability::record_cache_query;

/// Runtime options for the cache service
#[derive(Debug, Clone)]
pub struct SemanticCacheServiceConfig {
    /// Upper bound on a whole query, including retries
    pub query_timeout: Duration,
    /// Number of recent queries kept for the history view
    pub history_size: usize,
}

impl Default for SemanticCacheServiceConfig {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_secs(120),
            history_size: 50,
        }
    }
}

#[derive(Debug, Default, Clone)]
struct QueryCounters {
    exact_hits: u64,
    similarity_hits: u64,
    misses: u64,
    errors: u64,
    total_millis: u64,
}

impl QueryCounters {
    fn record(&mut self, outcome: &QueryOutcome) {
        match outcome.provenance {
            Provenance::ExactHit => self.exact_hits += 1,
            Provenance::SimilarityHit => self.similarity_hits += 1,
            Provenance::MissGenerated => self.misses += 1,
            Provenance::Error => self.errors += 1,
        }
        self.total_millis += outcome.time_millis;
    }

    fn total(&self) -> u64 {
        self.exact_hits + self.similarity_hits + self.misses + self.errors
    }
}

/// Cache orchestrator shared by all request handlers
#[derive(Debug)]
pub struct SemanticCacheService {
    store: Arc<dyn CacheStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn GenerationClient>,
    engine: Arc<dyn SimilarityEngine>,
    settings: RwLock<CacheSettings>,
    counters: Mutex<QueryCounters>,
    history: Mutex<VecDeque<QueryRecord>>,
    // Held across the store resize and the settings write
    configure_lock: tokio::sync::Mutex<()>,
    config: SemanticCacheServiceConfig,
}

impl SemanticCacheService {
    pub fn new(
        store: Arc<dyn CacheStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationClient>,
        settings: CacheSettings,
    ) -> Result<Self, DomainError> {
        settings.validate()?;

        if settings.capacity != store.capacity() {
            return Err(DomainError::invalid_configuration(format!(
                "settings capacity {} does not match store capacity {}",
                settings.capacity,
                store.capacity()
            )));
        }

        Ok(Self {
            store,
            embedder,
            generator,
            engine: Arc::new(LinearScanEngine::new()),
            settings: RwLock::new(settings),
            counters: Mutex::new(QueryCounters::default()),
            history: Mutex::new(VecDeque::new()),
            configure_lock: tokio::sync::Mutex::new(()),
            config: SemanticCacheServiceConfig::default(),
        })
    }

    pub fn with_engine(mut self, engine: Arc<dyn SimilarityEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_config(mut self, config: SemanticCacheServiceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn settings(&self) -> Result<CacheSettings, DomainError> {
        self.settings
            .read()
            .map(|s| *s)
            .map_err(|e| DomainError::internal(format!("Failed to read cache settings: {}", e)))
    }

    /// Answer a query, always producing a tagged outcome
    pub async fn query(&self, query: &str) -> QueryOutcome {
        let started = Instant::now();
        let timeout = self.config.query_timeout;

        let result = match tokio::time::timeout(timeout, self.resolve(query)).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::timeout(timeout.as_millis() as u64)),
        };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Query failed");
                QueryOutcome::failed(&e)
            }
        }
        .with_elapsed(started.elapsed());

        record_cache_query(outcome.provenance, started.elapsed());
        self.record(query, &outcome);

        outcome
    }

    async fn resolve(&self, query: &str) -> Result<QueryOutcome, DomainError> {
        let key = CacheKey::normalize(query);

        if key.is_empty() {
            return Err(DomainError::validation("query must not be empty"));
        }

        if let Some(entry) = self.store.get(key.as_str()).await? {
            debug!(key = %key, "Exact cache hit");
            return Ok(QueryOutcome::exact_hit(entry.response()));
        }

        let embedding = self.embedder.embed(query).await?;

        let norm = magnitude(&embedding);
        if embedding.is_empty() || !norm.is_finite() || norm <= 0.0 {
            return Err(DomainError::embedding(
                self.embedder.provider_name(),
                format!("query embedding has unusable magnitude {}", norm),
            ));
        }

        let threshold = self.settings()?.similarity_threshold;
        let candidates = self.store.candidates().await?;

        if let Some(found) = self
            .engine
            .find_best_match(&embedding, &candidates, threshold)?
        {
            // The match may have been evicted since the candidate snapshot
            match self.store.get(&found.key).await? {
                Some(entry) => {
                    debug!(
                        key = %key,
                        matched = %found.key,
                        similarity = found.similarity,
                        "Similarity cache hit"
                    );
                    return Ok(QueryOutcome::similarity_hit(
                        entry.response(),
                        found.similarity,
                    ));
                }
                None => debug!(matched = %found.key, "Matched entry evicted before read"),
            }
        }

        let text = self.generator.generate(query).await?;

        if text.trim().is_empty() {
            return Err(DomainError::malformed_response(
                self.generator.provider_name(),
                "generated text is empty",
            ));
        }

        if let Some(evicted) = self
            .store
            .put(key.as_str(), text.clone(), Some(embedding))
            .await?
        {
            debug!(key = %key, evicted = %evicted, "Stored response with eviction");
        }

        Ok(QueryOutcome::generated(text))
    }

    fn record(&self, query: &str, outcome: &QueryOutcome) {
        match self.counters.lock() {
            Ok(mut counters) => counters.record(outcome),
            Err(e) => warn!("Failed to update query counters: {}", e),
        }

        let record = QueryRecord {
            query: query.to_string(),
            provenance: outcome.provenance,
            response: outcome.text.clone(),
            time_millis: outcome.time_millis,
            at: Utc::now(),
        };

        match self.history.lock() {
            Ok(mut history) => {
                history.push_back(record);
                while history.len() > self.config.history_size {
                    history.pop_front();
                }
            }
            Err(e) => warn!("Failed to update query history: {}", e),
        }
    }

    /// Empty the store and reset statistics and history
    pub async fn clear(&self) -> Result<(), DomainError> {
        self.store.clear().await?;

        self.counters
            .lock()
            .map_err(|e| DomainError::internal(format!("Failed to reset counters: {}", e)))
            .map(|mut counters| *counters = QueryCounters::default())?;

        self.history
            .lock()
            .map_err(|e| DomainError::internal(format!("Failed to reset history: {}", e)))
            .map(|mut history| history.clear())?;

        info!("Cache cleared");
        Ok(())
    }

    /// Apply a new capacity and threshold; shrinking evicts the oldest entries
    pub async fn configure(
        &self,
        capacity: usize,
        similarity_threshold: f32,
    ) -> Result<CacheSettings, DomainError> {
        let settings = CacheSettings::new(capacity, similarity_threshold)?;

        let _guard = self.configure_lock.lock().await;
        let evicted = self.store.set_capacity(capacity).await?;

        let mut current = self
            .settings
            .write()
            .map_err(|e| DomainError::internal(format!("Failed to write cache settings: {}", e)))?;
        *current = settings;
        drop(current);

        info!(
            capacity,
            similarity_threshold,
            evicted = evicted.len(),
            "Cache reconfigured"
        );

        Ok(settings)
    }

    pub async fn stats(&self) -> Result<CacheStats, DomainError> {
        let entries = self.store.size().await?;
        let settings = self.settings()?;
        let counters = self
            .counters
            .lock()
            .map_err(|e| DomainError::internal(format!("Failed to read counters: {}", e)))?
            .clone();

        let total = counters.total();
        let avg_response_millis = if total == 0 {
            0.0
        } else {
            counters.total_millis as f64 / total as f64
        };

        Ok(CacheStats {
            entries,
            capacity: self.store.capacity(),
            similarity_threshold: settings.similarity_threshold,
            exact_hits: counters.exact_hits,
            similarity_hits: counters.similarity_hits,
            misses: counters.misses,
            errors: counters.errors,
            evictions: self.store.evictions(),
            avg_response_millis,
            ..Default::default()
        }
        .with_rates())
    }

    /// Most recent queries, newest first
    pub fn history(&self, limit: usize) -> Result<Vec<QueryRecord>, DomainError> {
        let history = self
            .history
            .lock()
            .map_err(|e| DomainError::internal(format!("Failed to read history: {}", e)))?;

        Ok(history.iter().rev().take(limit).cloned().collect())
    }
}
