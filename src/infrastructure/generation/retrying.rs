//! Retrying decorator around a generation client

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::domain::generation::RetryDecision;
use crate::domain::{DomainError, GenerationClient, RetryPolicy};
use crate::infrastructure::observability::record_generation_attempt;

/// Retries an inner client while it reports the service as unavailable
///
/// Only `RemoteUnavailable` (HTTP 503) is retried. Other transport or status
/// failures end the sequence as `GenerationFailed`, and a malformed payload is
/// returned unchanged.
#[derive(Debug)]
pub struct RetryingGenerationClient {
    inner: Arc<dyn GenerationClient>,
    policy: RetryPolicy,
}

impl RetryingGenerationClient {
    pub fn new(inner: Arc<dyn GenerationClient>, policy: RetryPolicy) -> Result<Self, DomainError> {
        policy.validate()?;

        Ok(Self { inner, policy })
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl GenerationClient for RetryingGenerationClient {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        let provider = self.inner.provider_name();
        let mut state = self.policy.start();

        loop {
            let attempt = state.begin_attempt();

            let err = match self.inner.generate(prompt).await {
                Ok(text) => {
                    record_generation_attempt(provider, "success");
                    debug!(provider, attempt, "Generation succeeded");
                    return Ok(text);
                }
                Err(err) => err,
            };

            match state.on_failure(&err) {
                RetryDecision::Retry(delay) => {
                    record_generation_attempt(provider, "unavailable");
                    warn!(
                        provider,
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Generation service unavailable, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::Exhausted => {
                    record_generation_attempt(provider, "unavailable");
                    error!(
                        provider,
                        attempts = state.attempts(),
                        total_delay_ms = state.total_delay().as_millis() as u64,
                        "Generation retries exhausted"
                    );
                    return Err(DomainError::generation_failed(
                        state.attempts(),
                        err.to_string(),
                    ));
                }
                RetryDecision::Abort => {
                    record_generation_attempt(provider, "error");
                    warn!(provider, attempt, error = %err, "Generation failed");

                    return Err(match err {
                        DomainError::MalformedResponse { .. } => err,
                        other => DomainError::generation_failed(state.attempts(), other.to_string()),
                    });
                }
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}
