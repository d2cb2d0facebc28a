use serde::Deserialize;
use std::sync::Arc;

use super::{GeminiEmbeddingProvider, HttpClient, OpenAiEmbeddingProvider};
use crate::domain::{DomainError, EmbeddingProvider};
use crate::infrastructure::llm::{require_api_key, ProviderKind};

/// Embedding provider configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbeddingProviderConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    /// Overrides the known dimensionality of the model
    #[serde(default)]
    pub dimensions: Option<usize>,
}

/// Factory for creating embedding providers
#[derive(Debug)]
pub struct EmbeddingProviderFactory;

impl EmbeddingProviderFactory {
    pub fn create(
        config: &EmbeddingProviderConfig,
        http_client: HttpClient,
    ) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
        let api_key = require_api_key(&config.api_key, "embedding")?;

        match config.provider {
            ProviderKind::Gemini => {
                let mut provider = match &config.base_url {
                    Some(url) => GeminiEmbeddingProvider::with_base_url(http_client, api_key, url),
                    None => GeminiEmbeddingProvider::new(http_client, api_key),
                };
                if config.model.is_some() || config.dimensions.is_some() {
                    let model = config.model.clone().unwrap_or_else(|| provider.model().to_string());
                    provider = provider.with_model(model, config.dimensions);
                }
                Ok(Arc::new(provider))
            }
            ProviderKind::OpenAi => {
                let mut provider = match &config.base_url {
                    Some(url) => OpenAiEmbeddingProvider::with_base_url(http_client, api_key, url),
                    None => OpenAiEmbeddingProvider::new(http_client, api_key),
                };
                if config.model.is_some() || config.dimensions.is_some() {
                    let model = config.model.clone().unwrap_or_else(|| provider.model().to_string());
                    provider = provider.with_model(model, config.dimensions);
                }
                Ok(Arc::new(provider))
            }
        }
    }
}
