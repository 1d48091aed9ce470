//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for embedding providers (HuggingFace, local models, etc.)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Produce the embedding vector for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Get the model used by this provider
    fn model(&self) -> &str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Embedding provider returning scripted vectors
    ///
    /// Texts without a scripted vector get a deterministic one-hot vector.
    #[derive(Debug)]
    pub struct MockEmbeddingProvider {
        name: &'static str,
        dimensions: usize,
        vectors: HashMap<String, Vec<f32>>,
        error: Option<String>,
        calls: AtomicUsize,
    }

    impl MockEmbeddingProvider {
        pub fn new(name: &'static str, dimensions: usize) -> Self {
            Self {
                name,
                dimensions,
                vectors: HashMap::new(),
                error: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
            self.vectors.insert(text.into(), vector);
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbeddingProvider {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(ref error) = self.error {
                return Err(DomainError::embedding(self.name, error));
            }

            if let Some(vector) = self.vectors.get(text) {
                return Ok(vector.clone());
            }

            let hash = text
                .bytes()
                .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
            let mut vector = vec![0.0; self.dimensions];
            vector[(hash % self.dimensions as u64) as usize] = 1.0;

            Ok(vector)
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }

        fn model(&self) -> &str {
            "mock-embedding"
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_provider_scripted_vector() {
            let provider = MockEmbeddingProvider::new("test", 3).with_vector("hello", vec![1.0, 2.0, 3.0]);

            let vector = provider.embed("hello").await.unwrap();

            assert_eq!(vector, vec![1.0, 2.0, 3.0]);
            assert_eq!(provider.calls(), 1);
        }

        #[tokio::test]
        async fn test_mock_provider_error() {
            let provider = MockEmbeddingProvider::new("test", 128).with_error("model offline");

            let result = provider.embed("Hello").await;

            assert!(matches!(result, Err(DomainError::Embedding { .. })));
        }

        #[tokio::test]
        async fn test_deterministic_embeddings() {
            let provider = MockEmbeddingProvider::new("test", 128);

            let first = provider.embed("Hello").await.unwrap();
            let second = provider.embed("Hello").await.unwrap();

            assert_eq!(first, second);
            assert_eq!(first.len(), 128);
        }
    }
}
