//! Cache settings

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Capacity and similarity threshold for a cache instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Maximum number of entries to store
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Minimum cosine similarity for a similarity hit (0.0 to 1.0)
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
}

fn default_capacity() -> usize {
    100
}

fn default_similarity_threshold() -> f32 {
    0.8
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

impl CacheSettings {
    /// Create validated settings
    pub fn new(capacity: usize, similarity_threshold: f32) -> Result<Self, DomainError> {
        let settings = Self {
            capacity,
            similarity_threshold,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that could only fail later at query time
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_capacity(self.capacity)?;

        if !self.similarity_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.similarity_threshold)
        {
            return Err(DomainError::invalid_configuration(format!(
                "similarity threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }

        Ok(())
    }
}

pub(crate) fn validate_capacity(capacity: usize) -> Result<(), DomainError> {
    if capacity == 0 {
        return Err(DomainError::invalid_configuration(
            "capacity must be at least 1",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = CacheSettings::default();

        assert_eq!(settings.capacity, 100);
        assert!((settings.similarity_threshold - 0.8).abs() < f32::EPSILON);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = CacheSettings::new(0, 0.8);

        assert!(matches!(
            result,
            Err(DomainError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        assert!(CacheSettings::new(10, 1.01).is_err());
        assert!(CacheSettings::new(10, -0.1).is_err());
        assert!(CacheSettings::new(10, f32::NAN).is_err());
    }

    #[test]
    fn test_threshold_bounds_accepted() {
        assert!(CacheSettings::new(1, 0.0).is_ok());
        assert!(CacheSettings::new(1, 1.0).is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let settings: CacheSettings = serde_json::from_str(r#"{"capacity": 2}"#).unwrap();

        assert_eq!(settings.capacity, 2);
        assert!((settings.similarity_threshold - 0.8).abs() < f32::EPSILON);
    }
}
