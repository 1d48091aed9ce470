//! Provenance-tagged query results

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// How a query result was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    ExactHit,
    SimilarityHit,
    MissGenerated,
    Error,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExactHit => "exact-hit",
            Self::SimilarityHit => "similarity-hit",
            Self::MissGenerated => "miss-generated",
            Self::Error => "error",
        }
    }

    /// Whether the answer came out of the cache
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::ExactHit | Self::SimilarityHit)
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a failed query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryErrorKind {
    Validation,
    EmbeddingFailure,
    MalformedResponse,
    GenerationFailure,
    Timeout,
    Internal,
}

/// Serializable description of why a query failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryError {
    pub kind: QueryErrorKind,
    pub message: String,
}

impl From<&DomainError> for QueryError {
    fn from(err: &DomainError) -> Self {
        let kind = match err {
            DomainError::Validation { .. } | DomainError::InvalidConfiguration { .. } => {
                QueryErrorKind::Validation
            }
            DomainError::Embedding { .. } => QueryErrorKind::EmbeddingFailure,
            DomainError::MalformedResponse { .. } => QueryErrorKind::MalformedResponse,
            DomainError::RemoteUnavailable { .. }
            | DomainError::RemoteStatus { .. }
            | DomainError::Transport { .. }
            | DomainError::GenerationFailed { .. } => QueryErrorKind::GenerationFailure,
            DomainError::Timeout { .. } => QueryErrorKind::Timeout,
            DomainError::Internal { .. } => QueryErrorKind::Internal,
        };

        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// Result of a cache query
///
/// `text` is present exactly when `provenance` is not [`Provenance::Error`];
/// `error` is present exactly when it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub provenance: Provenance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<QueryError>,
    /// Similarity score of the matched entry, for similarity hits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,
    pub time_millis: u64,
}

impl QueryOutcome {
    pub fn exact_hit(text: impl Into<String>) -> Self {
        Self::answered(Provenance::ExactHit, text.into(), None)
    }

    pub fn similarity_hit(text: impl Into<String>, similarity: f32) -> Self {
        Self::answered(Provenance::SimilarityHit, text.into(), Some(similarity))
    }

    pub fn generated(text: impl Into<String>) -> Self {
        Self::answered(Provenance::MissGenerated, text.into(), None)
    }

    pub fn failed(error: &DomainError) -> Self {
        Self {
            provenance: Provenance::Error,
            text: None,
            error: Some(QueryError::from(error)),
            similarity: None,
            time_millis: 0,
        }
    }

    fn answered(provenance: Provenance, text: String, similarity: Option<f32>) -> Self {
        Self {
            provenance,
            text: Some(text),
            error: None,
            similarity,
            time_millis: 0,
        }
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.time_millis = elapsed.as_millis() as u64;
        self
    }

    pub fn is_error(&self) -> bool {
        self.provenance == Provenance::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance_serialization() {
        assert_eq!(
            serde_json::to_string(&Provenance::ExactHit).unwrap(),
            "\"exact-hit\""
        );
        assert_eq!(
            serde_json::to_string(&Provenance::SimilarityHit).unwrap(),
            "\"similarity-hit\""
        );
        assert_eq!(
            serde_json::to_string(&Provenance::MissGenerated).unwrap(),
            "\"miss-generated\""
        );
        assert_eq!(serde_json::to_string(&Provenance::Error).unwrap(), "\"error\"");
    }

    #[test]
    fn test_failed_outcome_has_no_text() {
        let outcome = QueryOutcome::failed(&DomainError::generation_failed(3, "unavailable"));

        assert!(outcome.is_error());
        assert!(outcome.text.is_none());
        assert_eq!(
            outcome.error.as_ref().map(|e| e.kind),
            Some(QueryErrorKind::GenerationFailure)
        );
    }

    #[test]
    fn test_error_kind_mapping() {
        let kind = |e: DomainError| QueryError::from(&e).kind;

        assert_eq!(kind(DomainError::validation("x")), QueryErrorKind::Validation);
        assert_eq!(
            kind(DomainError::embedding("hf", "x")),
            QueryErrorKind::EmbeddingFailure
        );
        assert_eq!(
            kind(DomainError::malformed_response("hf", "x")),
            QueryErrorKind::MalformedResponse
        );
        assert_eq!(
            kind(DomainError::transport("x")),
            QueryErrorKind::GenerationFailure
        );
        assert_eq!(kind(DomainError::timeout(10)), QueryErrorKind::Timeout);
    }

    #[test]
    fn test_outcome_json_shape() {
        let outcome = QueryOutcome::similarity_hit("Cats are great!", 0.85)
            .with_elapsed(Duration::from_millis(12));

        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["provenance"], "similarity-hit");
        assert_eq!(json["text"], "Cats are great!");
        assert_eq!(json["time_millis"], 12);
        assert!(json.get("error").is_none());
    }
}
