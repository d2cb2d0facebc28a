//! OpenAI embedding provider implementation

use async_trait::async_trait;
use tracing::warn;

use super::HttpClientTrait;
use crate::domain::embedding::{decode_embedding_value, EmbeddingProvider, EmbeddingShape};
use crate::domain::DomainError;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// Known OpenAI embedding models and their dimensions
const EMBEDDING_MODELS: &[(&str, usize)] = &[
    ("text-embedding-3-small", 1536),
    ("text-embedding-3-large", 3072),
    ("text-embedding-ada-002", 1536),
];

/// OpenAI embedding provider
#[derive(Debug)]
pub struct OpenAiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
    model: String,
    dimensions: Option<usize>,
}

impl<C: HttpClientTrait> OpenAiEmbeddingProvider<C> {
    /// Create a new OpenAI embedding provider
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    /// Create a new provider with custom base URL
    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
            model: DEFAULT_MODEL.to_string(),
            dimensions: known_dimensions(DEFAULT_MODEL),
        }
    }

    /// Use another model; explicit `dimensions` are also sent to the API
    pub fn with_model(mut self, model: impl Into<String>, dimensions: Option<usize>) -> Self {
        let model = model.into();
        self.dimensions = dimensions.or_else(|| known_dimensions(&model));
        self.model = model;
        self
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_request(&self, text: &str) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "input": text,
        });

        if let Some(dims) = self.dimensions {
            if known_dimensions(&self.model) != Some(dims) {
                body["dimensions"] = serde_json::json!(dims);
            }
        }

        body
    }

    fn parse_response(&self, json: &serde_json::Value) -> Vec<f32> {
        let element = json
            .get("data")
            .and_then(|d| d.get(0))
            .and_then(|d| d.get("embedding"))
            .unwrap_or(&serde_json::Value::Null);

        let (vector, shape) = decode_embedding_value(element);

        if shape == EmbeddingShape::Missing {
            warn!(model = %self.model, "OpenAI embedding response had no vector");
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
impl<C: HttpClientTrait> EmbeddingProvider for OpenAiEmbeddingProvider<C> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let url = self.embeddings_url();
        let body = self.build_request(text);

        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(|e| e.into_embedding("openai"))?;

        Ok(self.parse_response(&response))
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::MockHttpClient;
    use serde_json::json;

    const TEST_URL: &str = "https://api.openai.com/v1/embeddings";

    fn create_mock_response(dimensions: usize) -> serde_json::Value {
        let embedding: Vec<f32> = (0..dimensions).map(|j| j as f32 * 0.001).collect();
        json!({
            "model": "text-embedding-3-small",
            "data": [{"index": 0, "embedding": embedding, "object": "embedding"}],
            "usage": {"prompt_tokens": 10, "total_tokens": 10}
        })
    }

    #[tokio::test]
    async fn test_embed_single_text() {
        let client = MockHttpClient::new().with_response(TEST_URL, create_mock_response(1536));
        let provider = OpenAiEmbeddingProvider::new(client, "test-api-key");

        let embedding = provider.embed("Hello world").await.unwrap();

        assert_eq!(embedding.len(), 1536);
        let requests = provider.client.requests();
        assert_eq!(requests[0].header("Authorization"), Some("Bearer test-api-key"));
        assert_eq!(
            requests[0].body,
            Some(json!({"model": "text-embedding-3-small", "input": "Hello world"}))
        );
    }

    #[tokio::test]
    async fn test_embed_with_custom_dimensions() {
        let client = MockHttpClient::new().with_response(TEST_URL, create_mock_response(256));
        let provider = OpenAiEmbeddingProvider::new(client, "test-api-key")
            .with_model("text-embedding-3-small", Some(256));

        let embedding = provider.embed("Hello").await.unwrap();

        assert_eq!(embedding.len(), 256);
        assert_eq!(provider.client.requests()[0].body.as_ref().unwrap()["dimensions"], 256);
    }

    #[tokio::test]
    async fn test_embed_error() {
        let client = MockHttpClient::new().with_error(TEST_URL, "Rate limit exceeded");
        let provider = OpenAiEmbeddingProvider::new(client, "test-api-key");

        let result = provider.embed("Hello").await;

        assert!(matches!(result, Err(DomainError::Embedding { .. })));
    }

    #[tokio::test]
    async fn test_custom_base_url() {
        let custom_url = "http://localhost:8080/v1/embeddings";
        let client = MockHttpClient::new().with_response(custom_url, create_mock_response(1536));
        let provider =
            OpenAiEmbeddingProvider::with_base_url(client, "test-key", "http://localhost:8080/");

        assert_eq!(provider.embed("Test").await.unwrap().len(), 1536);
    }

    #[test]
    fn test_provider_info() {
        let provider = OpenAiEmbeddingProvider::new(MockHttpClient::new(), "test-key");

        assert_eq!(provider.provider_name(), "openai");
        assert_eq!(provider.model(), "text-embedding-3-small");
        assert_eq!(provider.dimensions(), Some(1536));

        let large = OpenAiEmbeddingProvider::new(MockHttpClient::new(), "test-key")
            .with_model("text-embedding-3-large", None);
        assert_eq!(large.dimensions(), Some(3072));
    }
}
