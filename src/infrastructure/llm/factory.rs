use serde::Deserialize;
use std::sync::Arc;

use super::gemini::DEFAULT_GEMINI_MODEL;
use super::http_client::HttpClient;
use super::openai::DEFAULT_OPENAI_MODEL;
use super::{GeminiProvider, OpenAiProvider};
use crate::domain::{DomainError, LlmProvider};

/// Remote model vendor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    #[serde(alias = "open_ai")]
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
        }
    }
}

/// Answer generation provider configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmProviderConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl LlmProviderConfig {
    /// Configured model, or the vendor default
    pub fn model(&self) -> &str {
        match (&self.model, self.provider) {
            (Some(model), _) => model,
            (None, ProviderKind::Gemini) => DEFAULT_GEMINI_MODEL,
            (None, ProviderKind::OpenAi) => DEFAULT_OPENAI_MODEL,
        }
    }
}

/// Fetch the API key or fail with a configuration error naming the section
pub(crate) fn require_api_key<'a>(
    api_key: &'a Option<String>,
    section: &str,
) -> Result<&'a str, DomainError> {
    api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| DomainError::configuration(format!("{}.api_key is not set", section)))
}

/// Factory for creating LLM providers
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create an LLM provider from configuration
    pub fn create(
        config: &LlmProviderConfig,
        http_client: HttpClient,
    ) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let api_key = require_api_key(&config.api_key, "generation")?;
        let model = config.model();

        match config.provider {
            ProviderKind::Gemini => {
                let provider = match &config.base_url {
                    Some(url) => GeminiProvider::with_base_url(http_client, api_key, url),
                    None => GeminiProvider::new(http_client, api_key),
                };
                Ok(Arc::new(provider.with_model(model)))
            }
            ProviderKind::OpenAi => {
                let provider = match &config.base_url {
                    Some(url) => OpenAiProvider::with_base_url(http_client, api_key, url),
                    None => OpenAiProvider::new(http_client, api_key),
                };
                Ok(Arc::new(provider.with_model(model)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: ProviderKind, api_key: Option<&str>) -> LlmProviderConfig {
        LlmProviderConfig {
            provider,
            api_key: api_key.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_gemini_provider() {
        let provider =
            LlmProviderFactory::create(&config(ProviderKind::Gemini, Some("key")), HttpClient::new())
                .unwrap();
        assert_eq!(provider.provider_name(), "gemini");
        assert_eq!(provider.model(), "gemini-2.5-flash");
    }

    #[test]
    fn test_create_openai_provider() {
        let mut cfg = config(ProviderKind::OpenAi, Some("key"));
        cfg.model = Some("gpt-4o".to_string());

        let provider = LlmProviderFactory::create(&cfg, HttpClient::new()).unwrap();
        assert_eq!(provider.provider_name(), "openai");
        assert_eq!(provider.model(), "gpt-4o");
    }

    #[test]
    fn test_missing_api_key() {
        let result = LlmProviderFactory::create(&config(ProviderKind::Gemini, None), HttpClient::new());
        assert!(matches!(result, Err(DomainError::Configuration { .. })));

        let result =
            LlmProviderFactory::create(&config(ProviderKind::Gemini, Some("  ")), HttpClient::new());
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_provider_kind_deserialize() {
        let kind: ProviderKind = serde_json::from_str("\"openai\"").unwrap();
        assert_eq!(kind, ProviderKind::OpenAi);
        let kind: ProviderKind = serde_json::from_str("\"gemini\"").unwrap();
        assert_eq!(kind, ProviderKind::Gemini);
    }
}
