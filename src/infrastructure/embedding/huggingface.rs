//! HuggingFace feature-extraction embedding provider

use async_trait::async_trait;
use serde_json::Value;

use super::HttpClientTrait;
use crate::domain::{DomainError, EmbeddingProvider};

pub const DEFAULT_EMBEDDING_URL: &str = "https://api-inference.huggingface.co/pipeline/feature-extraction/sentence-transformers/all-MiniLM-L6-v2";

const PROVIDER: &str = "huggingface";

/// Embedding provider backed by the HuggingFace feature-extraction pipeline
#[derive(Debug)]
pub struct HuggingFaceEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    api_url: String,
    model: String,
}

impl<C: HttpClientTrait> HuggingFaceEmbeddingProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_url(client, api_key, DEFAULT_EMBEDDING_URL)
    }

    pub fn with_url(client: C, api_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into();
        let model = model_from_url(&api_url);

        Self {
            client,
            auth_header: format!("Bearer {}", api_key.into()),
            api_url,
            model,
        }
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }
}

/// Last two path segments, e.g. `sentence-transformers/all-MiniLM-L6-v2`
fn model_from_url(url: &str) -> String {
    let segments: Vec<&str> = url
        .trim_end_matches('/')
        .rsplit('/')
        .take(2)
        .collect();

    segments.into_iter().rev().collect::<Vec<_>>().join("/")
}

/// Accepts a flat `[f32]` or a single-row nested `[[f32]]`
fn parse_vector(json: &Value) -> Result<Vec<f32>, DomainError> {
    let malformed = |message: &str| DomainError::malformed_response(PROVIDER, message);

    let outer = json
        .as_array()
        .ok_or_else(|| malformed("expected a JSON array"))?;

    let row = match outer.first() {
        Some(Value::Array(inner)) => inner,
        Some(_) => outer,
        None => return Err(malformed("empty embedding")),
    };

    let vector = row
        .iter()
        .map(|v| v.as_f64().map(|f| f as f32))
        .collect::<Option<Vec<f32>>>()
        .ok_or_else(|| malformed("embedding contains non-numeric values"))?;

    if vector.is_empty() {
        return Err(malformed("empty embedding"));
    }

    Ok(vector)
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for HuggingFaceEmbeddingProvider<C> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let body = serde_json::json!({ "inputs": text });

        let response = self
            .client
            .post_json(&self.api_url, self.headers(), &body)
            .await
            .map_err(|e| match e {
                DomainError::MalformedResponse { .. } => e,
                other => DomainError::embedding(PROVIDER, other.to_string()),
            })?;

        parse_vector(&response)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::{MockHttpClient, MockReply};

    const TEST_URL: &str = "https://hf.test/pipeline/feature-extraction/org/model";

    fn provider_with(reply: Value) -> HuggingFaceEmbeddingProvider<MockHttpClient> {
        let http = MockHttpClient::new().with_response(TEST_URL, reply);
        HuggingFaceEmbeddingProvider::with_url(http, "hf_test", TEST_URL)
    }

    #[tokio::test]
    async fn test_flat_vector() {
        let provider = provider_with(serde_json::json!([0.1, 0.2, 0.3]));

        let vector = provider.embed("hello").await.unwrap();

        assert_eq!(vector, vec![0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn test_nested_vector() {
        let provider = provider_with(serde_json::json!([[0.5, -0.5]]));

        let vector = provider.embed("hello").await.unwrap();

        assert_eq!(vector, vec![0.5, -0.5]);
    }

    #[tokio::test]
    async fn test_request_carries_text_and_token() {
        let provider = provider_with(serde_json::json!([1.0]));

        provider.embed("What is Rust?").await.unwrap();

        let requests = provider.client.requests();
        assert_eq!(requests[0].url, TEST_URL);
        assert_eq!(requests[0].body, serde_json::json!({"inputs": "What is Rust?"}));
        assert!(
            requests[0]
                .headers
                .contains(&("Authorization".to_string(), "Bearer hf_test".to_string()))
        );
    }

    #[tokio::test]
    async fn test_unexpected_shapes_are_malformed() {
        for reply in [
            serde_json::json!({"error": "loading"}),
            serde_json::json!([]),
            serde_json::json!([[]]),
            serde_json::json!(["a", "b"]),
        ] {
            let result = provider_with(reply).embed("hi").await;
            assert!(matches!(result, Err(DomainError::MalformedResponse { .. })));
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_embedding_error() {
        let http = MockHttpClient::new().with_sequence(TEST_URL, vec![MockReply::Status(500)]);
        let provider = HuggingFaceEmbeddingProvider::with_url(http, "hf_test", TEST_URL);

        let result = provider.embed("hi").await;

        assert!(matches!(result, Err(DomainError::Embedding { .. })));
    }

    #[test]
    fn test_model_name_from_url() {
        let provider = HuggingFaceEmbeddingProvider::new(MockHttpClient::new(), "k");

        assert_eq!(provider.model(), "sentence-transformers/all-MiniLM-L6-v2");
        assert_eq!(provider.provider_name(), "huggingface");
    }
}
