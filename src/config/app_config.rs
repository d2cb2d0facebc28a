use std::time::Duration;

use serde::Deserialize;

use crate::domain::retrieval::DEFAULT_TOP_K;
use crate::infrastructure::embedding::EmbeddingProviderConfig;
use crate::infrastructure::llm::{LlmProviderConfig, ProviderKind};
use crate::infrastructure::observability::MetricsConfig;
use crate::infrastructure::vector_store::{VectorStoreConfig, VectorStoreType};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub embedding: EmbeddingProviderConfig,
    #[serde(default)]
    pub generation: LlmProviderConfig,
    #[serde(default)]
    pub store: VectorStoreConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Limits applied to outbound calls
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    /// Per-request HTTP timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Overall deadline for one ingest or query operation; unset means none
    #[serde(default)]
    pub operation_deadline_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            operation_deadline_secs: None,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

impl RemoteConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn operation_deadline(&self) -> Option<Duration> {
        self.operation_deadline_secs.map(Duration::from_secs)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app: Self = config.try_deserialize()?;
        app.apply_env_fallbacks(|key| std::env::var(key).ok());

        Ok(app)
    }

    /// Fill unset credentials from the conventional vendor variables
    /// (`GEMINI_API_KEY`, `OPENAI_API_KEY`, `SUPABASE_URL`,
    /// `SUPABASE_ANON_KEY`, `DATABASE_URL`)
    pub fn apply_env_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let vendor_key = |kind: ProviderKind| match kind {
            ProviderKind::Gemini => lookup("GEMINI_API_KEY"),
            ProviderKind::OpenAi => lookup("OPENAI_API_KEY"),
        };

        if is_unset(&self.embedding.api_key) {
            self.embedding.api_key = vendor_key(self.embedding.provider);
        }
        if is_unset(&self.generation.api_key) {
            self.generation.api_key = vendor_key(self.generation.provider);
        }

        match self.store.store_type {
            VectorStoreType::Supabase => {
                if is_unset(&self.store.url) {
                    self.store.url = lookup("SUPABASE_URL");
                }
                if is_unset(&self.store.api_key) {
                    self.store.api_key = lookup("SUPABASE_ANON_KEY");
                }
            }
            VectorStoreType::Pgvector => {
                if is_unset(&self.store.database_url) {
                    self.store.database_url = lookup("DATABASE_URL");
                }
            }
            VectorStoreType::InMemory => {}
        }
    }
}

fn is_unset(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}
