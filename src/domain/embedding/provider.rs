//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Capability that turns text into a fixed-dimension vector (Gemini, OpenAI, ...)
///
/// Every call is a remote round trip and may fail transiently; failures come
/// back as `DomainError::Embedding` (or `Timeout`). Implementations do not retry.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate the embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Get the model this provider embeds with
    fn model(&self) -> &str;

    /// Get the embedding dimensions, when known for the model
    fn dimensions(&self) -> Option<usize>;
}
