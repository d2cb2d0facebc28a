//! Gemini embedding provider implementation

use async_trait::async_trait;
use tracing::warn;

use super::HttpClientTrait;
use crate::domain::embedding::{decode_embedding_value, EmbeddingProvider, EmbeddingShape};
use crate::domain::DomainError;

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const DEFAULT_MODEL: &str = "text-embedding-004";

/// Known Gemini embedding models and their dimensions
const EMBEDDING_MODELS: &[(&str, usize)] = &[
    ("text-embedding-004", 768),
    ("gemini-embedding-001", 3072),
];

/// Gemini embedding provider
#[derive(Debug)]
pub struct GeminiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
    model: String,
    dimensions: Option<usize>,
}

impl<C: HttpClientTrait> GeminiEmbeddingProvider<C> {
    /// Create a provider for `text-embedding-004`
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_GEMINI_BASE_URL)
    }

    /// Create a new provider with custom base URL
    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: DEFAULT_MODEL.to_string(),
            dimensions: known_dimensions(DEFAULT_MODEL),
        }
    }

    /// Use another model; `dimensions` overrides the known size for it
    pub fn with_model(mut self, model: impl Into<String>, dimensions: Option<usize>) -> Self {
        let model = model.into();
        self.dimensions = dimensions.or_else(|| known_dimensions(&model));
        self.model = model;
        self
    }

    fn embed_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:batchEmbedContents",
            self.base_url, self.model
        )
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("x-goog-api-key", self.api_key.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, text: &str) -> serde_json::Value {
        serde_json::json!({
            "requests": [{
                "model": format!("models/{}", self.model),
                "content": { "parts": [{ "text": text }] },
            }]
        })
    }

    fn parse_response(&self, json: &serde_json::Value) -> Vec<f32> {
        let element = json
            .get("embeddings")
            .and_then(|e| e.get(0))
            .or_else(|| json.get("embedding"))
            .unwrap_or(&serde_json::Value::Null);

        let (vector, shape) = decode_embedding_value(element);

        if shape == EmbeddingShape::Missing {
            warn!(model = %self.model, "Gemini embedding response had no vector");
        }

        vector
    }
}

fn known_dimensions(model: &str) -> Option<usize> {
    EMBEDDING_MODELS
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, dims)| *dims)
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for GeminiEmbeddingProvider<C> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let url = self.embed_url();
        let body = self.build_request(text);

        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(|e| e.into_embedding("gemini"))?;

        Ok(self.parse_response(&response))
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }
}
