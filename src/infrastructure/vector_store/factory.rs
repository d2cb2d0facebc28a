use serde::Deserialize;
use std::sync::Arc;

use super::{InMemoryVectorStore, PgvectorConfig, PgvectorStore, SupabaseVectorStore};
use crate::domain::{DomainError, VectorStore};
use crate::infrastructure::llm::HttpClient;

/// Vector store backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorStoreType {
    #[default]
    #[serde(alias = "memory")]
    InMemory,
    Pgvector,
    Supabase,
}

/// Vector store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(rename = "type", default)]
    pub store_type: VectorStoreType,
    /// PostgreSQL URL for `pgvector`
    #[serde(default)]
    pub database_url: Option<String>,
    /// Project URL for `supabase`
    #[serde(default)]
    pub url: Option<String>,
    /// Anon or service key for `supabase`
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default)]
    pub dimensions: Option<usize>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Create the table and match function on startup (`pgvector` only)
    #[serde(default)]
    pub ensure_schema: bool,
}

fn default_table() -> String {
    "documents".to_string()
}

fn default_max_connections() -> u32 {
    10
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            store_type: VectorStoreType::default(),
            database_url: None,
            url: None,
            api_key: None,
            table: default_table(),
            dimensions: None,
            max_connections: default_max_connections(),
            ensure_schema: false,
        }
    }
}

fn required<'a>(value: &'a Option<String>, key: &str) -> Result<&'a str, DomainError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| DomainError::configuration(format!("store.{} is not set", key)))
}

/// Factory for creating vector stores
#[derive(Debug)]
pub struct VectorStoreFactory;

impl VectorStoreFactory {
    /// Create the configured store; `embedding_dimensions` is used when the
    /// store section does not pin a size
    pub async fn create(
        config: &VectorStoreConfig,
        embedding_dimensions: Option<usize>,
        http_client: HttpClient,
    ) -> Result<Arc<dyn VectorStore>, DomainError> {
        let dimensions = config.dimensions.or(embedding_dimensions);

        match config.store_type {
            VectorStoreType::InMemory => Ok(Arc::new(match dimensions {
                Some(d) => InMemoryVectorStore::with_dimensions(d),
                None => InMemoryVectorStore::new(),
            })),
            VectorStoreType::Pgvector => {
                let url = required(&config.database_url, "database_url")?;
                let dimensions = dimensions.ok_or_else(|| {
                    DomainError::configuration("store.dimensions is required for pgvector")
                })?;
                let pg_config = PgvectorConfig::new(dimensions)
                    .with_table_name(&config.table)
                    .with_max_connections(config.max_connections);

                let store = PgvectorStore::connect(url, pg_config).await?;
                if config.ensure_schema {
                    store.ensure_schema().await?;
                }
                Ok(Arc::new(store))
            }
            VectorStoreType::Supabase => {
                let url = required(&config.url, "url")?;
                let api_key = required(&config.api_key, "api_key")?;
                let mut store =
                    SupabaseVectorStore::new(http_client, url, api_key).with_table(&config.table);
                if let Some(d) = dimensions {
                    store = store.with_dimensions(d);
                }
                Ok(Arc::new(store))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StoredChunk;

    #[tokio::test]
    async fn test_create_in_memory() {
        let store = VectorStoreFactory::create(&VectorStoreConfig::default(), Some(768), HttpClient::new())
            .await
            .unwrap();
        assert_eq!(store.store_type(), "in_memory");
    }

    #[tokio::test]
    async fn test_create_supabase() {
        let config = VectorStoreConfig {
            store_type: VectorStoreType::Supabase,
            url: Some("https://project.supabase.co".to_string()),
            api_key: Some("anon".to_string()),
            ..Default::default()
        };

        let store = VectorStoreFactory::create(&config, None, HttpClient::new())
            .await
            .unwrap();
        assert_eq!(store.store_type(), "supabase");
    }

    #[tokio::test]
    async fn test_missing_settings() {
        let config = VectorStoreConfig {
            store_type: VectorStoreType::Supabase,
            url: Some("https://project.supabase.co".to_string()),
            ..Default::default()
        };
        let result = VectorStoreFactory::create(&config, None, HttpClient::new()).await;
        assert!(matches!(result, Err(DomainError::Configuration { .. })));

        let config = VectorStoreConfig {
            store_type: VectorStoreType::Pgvector,
            ..Default::default()
        };
        let result = VectorStoreFactory::create(&config, Some(768), HttpClient::new()).await;
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_in_memory_uses_embedding_dimensions() {
        let store = tokio_test::block_on(VectorStoreFactory::create(
            &VectorStoreConfig::default(),
            Some(3),
            HttpClient::new(),
        ))
        .unwrap();

        let result = tokio_test::block_on(store.store(vec![StoredChunk::new("k", "c", vec![1.0, 0.0])]));
        assert!(matches!(result, Err(DomainError::Store { .. })));
    }

    #[test]
    fn test_store_type_deserialize() {
        let t: VectorStoreType = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(t, VectorStoreType::InMemory);
        let t: VectorStoreType = serde_json::from_str("\"pgvector\"").unwrap();
        assert_eq!(t, VectorStoreType::Pgvector);
    }
}
