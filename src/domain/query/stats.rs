//! Cache statistics and query history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Provenance;

/// Snapshot of cache effectiveness
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub similarity_threshold: f32,
    pub exact_hits: u64,
    pub similarity_hits: u64,
    pub misses: u64,
    pub errors: u64,
    pub evictions: u64,
    pub avg_response_millis: f64,
    /// Fraction of queries answered from the cache
    pub hit_rate: f32,
    /// Fraction of queries that went to the remote endpoint
    pub miss_rate: f32,
}

impl CacheStats {
    /// Total queries answered or attempted
    pub fn total_queries(&self) -> u64 {
        self.exact_hits + self.similarity_hits + self.misses + self.errors
    }

    /// Fill `hit_rate` and `miss_rate` from the counters
    pub fn with_rates(mut self) -> Self {
        let total = self.total_queries();

        if total == 0 {
            self.hit_rate = 0.0;
            self.miss_rate = 0.0;
        } else {
            self.hit_rate = (self.exact_hits + self.similarity_hits) as f32 / total as f32;
            self.miss_rate = (self.misses + self.errors) as f32 / total as f32;
        }

        self
    }
}

/// One entry of the recent query history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub query: String,
    pub provenance: Provenance,
    /// Answer returned to the caller, absent for errors
    pub response: Option<String>,
    pub time_millis: u64,
    pub at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates() {
        let stats = CacheStats {
            exact_hits: 5,
            similarity_hits: 3,
            misses: 1,
            errors: 1,
            ..Default::default()
        }
        .with_rates();

        assert_eq!(stats.total_queries(), 10);
        assert!((stats.hit_rate - 0.8).abs() < 0.001);
        assert!((stats.miss_rate - 0.2).abs() < 0.001);
    }

    #[test]
    fn test_rates_without_queries() {
        let stats = CacheStats::default().with_rates();

        assert_eq!(stats.hit_rate, 0.0);
        assert_eq!(stats.miss_rate, 0.0);
    }
}
