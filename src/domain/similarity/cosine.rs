//! Cosine similarity

use thiserror::Error;

use crate::domain::DomainError;

/// Reasons a similarity score cannot be computed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimilarityError {
    #[error("vector length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("cannot compare empty vectors")]
    Empty,

    #[error("vector has zero magnitude")]
    ZeroMagnitude,
}

impl From<SimilarityError> for DomainError {
    fn from(err: SimilarityError) -> Self {
        DomainError::embedding("similarity", err.to_string())
    }
}

/// Cosine similarity of two equal-length vectors, in `[-1, 1]`
///
/// Accumulates in `f64` so that identical vectors score exactly `1.0` after
/// narrowing back to `f32`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    if a.is_empty() {
        return Err(SimilarityError::Empty);
    }

    let (dot, norm_a, norm_b) = a.iter().zip(b.iter()).fold(
        (0.0f64, 0.0f64, 0.0f64),
        |(dot, na, nb), (&x, &y)| {
            let (x, y) = (f64::from(x), f64::from(y));
            (dot + x * y, na + x * x, nb + y * y)
        },
    );

    if norm_a == 0.0 || norm_b == 0.0 || !norm_a.is_finite() || !norm_b.is_finite() {
        return Err(SimilarityError::ZeroMagnitude);
    }

    let score = dot / (norm_a.sqrt() * norm_b.sqrt());

    Ok(score.clamp(-1.0, 1.0) as f32)
}

/// Euclidean norm, used to reject unusable query vectors up front
pub fn magnitude(v: &[f32]) -> f32 {
    v.iter()
        .map(|x| f64::from(*x) * f64::from(*x))
        .sum::<f64>()
        .sqrt() as f32
}
