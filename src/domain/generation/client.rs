//! Generation client trait

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Remote text generation: `prompt → text`
///
/// Implementations convert every transport fault into a typed
/// [`DomainError`]; an `Ok` value is always real generated text.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GenerationClient: Send + Sync + Debug {
    /// Generate a completion for the prompt
    async fn generate(&self, prompt: &str) -> Result<String, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
