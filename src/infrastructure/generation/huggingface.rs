//! HuggingFace inference API generation client

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{DomainError, GenerationClient};
use crate::infrastructure::llm::HttpClientTrait;

pub const DEFAULT_GENERATION_URL: &str =
    "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.3";

const PROVIDER: &str = "huggingface";

/// Text generation through the HuggingFace inference API
///
/// Sends `{"inputs": prompt}` and expects `[{"generated_text": "..."}, ...]`.
#[derive(Debug)]
pub struct HuggingFaceGenerationClient<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    api_url: String,
}

impl<C: HttpClientTrait> HuggingFaceGenerationClient<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_url(client, api_key, DEFAULT_GENERATION_URL)
    }

    pub fn with_url(client: C, api_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());

        Self {
            client,
            auth_header,
            api_url: api_url.into(),
        }
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn parse_response(json: Value) -> Result<String, DomainError> {
        let items = json.as_array().ok_or_else(|| {
            DomainError::malformed_response(PROVIDER, "expected a JSON array of generations")
        })?;

        let first = items
            .first()
            .ok_or_else(|| DomainError::malformed_response(PROVIDER, "empty generation list"))?;

        first
            .get("generated_text")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                DomainError::malformed_response(PROVIDER, "missing string field 'generated_text'")
            })
    }
}

#[async_trait]
impl<C: HttpClientTrait> GenerationClient for HuggingFaceGenerationClient<C> {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        let body = serde_json::json!({ "inputs": prompt });

        let response = self
            .client
            .post_json(&self.api_url, self.headers(), &body)
            .await?;

        Self::parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
