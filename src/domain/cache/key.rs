//! Cache key normalization

use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalize raw query text into its cache key form
///
/// Trims surrounding whitespace and lowercases. Pure and deterministic, so the
/// write path and the exact-match lookup path always agree.
pub fn normalize_key(text: &str) -> String {
    text.trim().to_lowercase()
}

/// A normalized cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build a key from raw text, normalizing it
    pub fn normalize(text: &str) -> Self {
        Self(normalize_key(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
