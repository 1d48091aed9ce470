//! Best-match search over cached embeddings

use std::fmt::Debug;

use serde::Serialize;
use tracing::warn;

use super::cosine::{cosine_similarity, magnitude, SimilarityError};

/// A stored key and the embedding of the query that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityCandidate {
    pub key: String,
    pub embedding: Vec<f32>,
}

impl SimilarityCandidate {
    pub fn new(key: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            key: key.into(),
            embedding,
        }
    }
}

/// The best candidate found for a query vector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityMatch {
    pub key: String,
    pub similarity: f32,
}

/// Strategy for finding the closest cached query
///
/// Implementations must keep single-best-match semantics: the highest score
/// wins, ties go to the earliest candidate, and scores below the threshold
/// are never returned.
pub trait SimilarityEngine: Send + Sync + Debug {
    fn find_best_match(
        &self,
        query: &[f32],
        candidates: &[SimilarityCandidate],
        threshold: f32,
    ) -> Result<Option<SimilarityMatch>, SimilarityError>;
}

/// Exhaustive scan, O(n) per lookup
///
/// Fine for the tens to low hundreds of entries this cache is sized for.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearScanEngine;

impl LinearScanEngine {
    pub fn new() -> Self {
        Self
    }
}

impl SimilarityEngine for LinearScanEngine {
    fn find_best_match(
        &self,
        query: &[f32],
        candidates: &[SimilarityCandidate],
        threshold: f32,
    ) -> Result<Option<SimilarityMatch>, SimilarityError> {
        if candidates.is_empty() {
            return Ok(None);
        }

        if query.is_empty() {
            return Err(SimilarityError::Empty);
        }

        if magnitude(query) == 0.0 {
            return Err(SimilarityError::ZeroMagnitude);
        }

        let mut best: Option<SimilarityMatch> = None;

        for candidate in candidates {
            let score = match cosine_similarity(query, &candidate.embedding) {
                Ok(score) => score,
                Err(e) => {
                    warn!(key = %candidate.key, error = %e, "Skipping unusable cached embedding");
                    continue;
                }
            };

            // Strict comparison keeps the first candidate on ties
            let improves = best.as_ref().is_none_or(|b| score > b.similarity);

            if improves {
                best = Some(SimilarityMatch {
                    key: candidate.key.clone(),
                    similarity: score,
                });
            }
        }

        Ok(best.filter(|m| m.similarity >= threshold))
    }
}

/// Convenience wrapper around [`LinearScanEngine`]
pub fn find_best_match(
    query: &[f32],
    candidates: &[SimilarityCandidate],
    threshold: f32,
) -> Result<Option<SimilarityMatch>, SimilarityError> {
    LinearScanEngine.find_best_match(query, candidates, threshold)
}
