//! Similarity search over cached query embeddings

mod cosine;
mod engine;

pub use cosine::{cosine_similarity, magnitude, SimilarityError};
pub use engine::{
    find_best_match, LinearScanEngine, SimilarityCandidate, SimilarityEngine, SimilarityMatch,
};
