//! pgvector vector store implementation

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;

use crate::domain::vector_store::{check_dimensions, ScoredChunk, StoredChunk, VectorStore};
use crate::domain::DomainError;

/// Configuration for the pgvector store
#[derive(Debug, Clone)]
pub struct PgvectorConfig {
    /// Embedding dimensions of the `embedding` column
    pub dimensions: usize,
    /// Table holding the chunks
    pub table_name: String,
    /// Server-side similarity function
    pub match_function: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl PgvectorConfig {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            table_name: "documents".to_string(),
            match_function: "match_documents".to_string(),
            max_connections: 10,
            connect_timeout_secs: 30,
        }
    }

    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = name.into();
        self
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Identifiers are interpolated into SQL, so only plain names are allowed
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.dimensions == 0 {
            return Err(DomainError::configuration("store.dimensions must be > 0"));
        }
        for name in [&self.table_name, &self.match_function] {
            if !is_plain_identifier(name) {
                return Err(DomainError::configuration(format!(
                    "invalid SQL identifier: {:?}",
                    name
                )));
            }
        }
        Ok(())
    }

    /// DDL creating the extension, the chunk table and the match function
    fn schema_statements(&self) -> Vec<String> {
        vec![
            "CREATE EXTENSION IF NOT EXISTS vector".to_string(),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                    id BIGSERIAL PRIMARY KEY,
                    file_path TEXT NOT NULL,
                    content TEXT NOT NULL,
                    embedding vector({dims}) NOT NULL
                )
                "#,
                table = self.table_name,
                dims = self.dimensions
            ),
            format!(
                r#"
                CREATE OR REPLACE FUNCTION {function}(query_embedding vector({dims}), match_count INT)
                RETURNS TABLE (id BIGINT, file_path TEXT, content TEXT, similarity FLOAT8)
                LANGUAGE sql STABLE
                AS $$
                    SELECT d.id, d.file_path, d.content, 1 - (d.embedding <=> query_embedding) AS similarity
                    FROM {table} d
                    ORDER BY d.embedding <=> query_embedding
                    LIMIT match_count
                $$
                "#,
                function = self.match_function,
                table = self.table_name,
                dims = self.dimensions
            ),
        ]
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name.len() <= 63
}

fn embedding_to_pgvector(embedding: &[f32]) -> String {
    let values: Vec<String> = embedding.iter().map(|v| v.to_string()).collect();
    format!("[{}]", values.join(","))
}

/// Vector store backed by PostgreSQL with the pgvector extension
pub struct PgvectorStore {
    pool: PgPool,
    config: PgvectorConfig,
}

impl Debug for PgvectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgvectorStore")
            .field("config", &self.config)
            .finish()
    }
}

impl PgvectorStore {
    pub fn new(pool: PgPool, config: PgvectorConfig) -> Result<Self, DomainError> {
        config.validate()?;
        Ok(Self { pool, config })
    }

    /// Connect a pool to `url` and wrap it
    pub async fn connect(url: &str, config: PgvectorConfig) -> Result<Self, DomainError> {
        config.validate()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(url)
            .await
            .map_err(|e| DomainError::store(format!("Failed to connect to PostgreSQL: {}", e)))?;

        Self::new(pool, config)
    }

    fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO {} (file_path, content, embedding) VALUES ($1, $2, $3::vector)",
            self.config.table_name
        )
    }

    fn search_sql(&self) -> String {
        format!(
            "SELECT content, similarity FROM {}($1::vector, $2)",
            self.config.match_function
        )
    }
}

#[async_trait]
impl VectorStore for PgvectorStore {
    fn store_type(&self) -> &'static str {
        "pgvector"
    }

    async fn store(&self, entries: Vec<StoredChunk>) -> Result<usize, DomainError> {
        for entry in &entries {
            check_dimensions(Some(self.config.dimensions), entry.dimensions())?;
        }

        let query = self.insert_sql();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::store(format!("Failed to begin transaction: {}", e)))?;

        for entry in &entries {
            sqlx::query(&query)
                .bind(&entry.key)
                .bind(&entry.content)
                .bind(embedding_to_pgvector(&entry.embedding))
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!(key = %entry.key, error = %e, "Chunk insert failed");
                    DomainError::store(format!("Insert failed: {}", e))
                })?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::store(format!("Commit failed: {}", e)))?;

        Ok(entries.len())
    }

    async fn similarity_search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>, DomainError> {
        check_dimensions(Some(self.config.dimensions), query_embedding.len())?;

        let match_count = i32::try_from(top_k)
            .map_err(|_| DomainError::validation(format!("top_k too large: {}", top_k)))?;

        let rows = sqlx::query(&self.search_sql())
            .bind(embedding_to_pgvector(query_embedding))
            .bind(match_count)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Similarity search failed");
                DomainError::store(format!("Search failed: {}", e))
            })?;

        let results: Vec<ScoredChunk> = rows
            .iter()
            .map(|row| {
                let content: String = row.get("content");
                let similarity: f64 = row.get("similarity");
                ScoredChunk::new(content, similarity as f32)
            })
            .collect();

        tracing::debug!(results = results.len(), top_k, "pgvector search completed");

        Ok(results)
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        let result = sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::store(format!("Health check failed: {}", e)))?;

        let _: i32 = result.get(0);
        Ok(true)
    }

    async fn ensure_schema(&self) -> Result<(), DomainError> {
        for statement in self.config.schema_statements() {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::store(format!("Failed to create schema: {}", e)))?;
        }

        // IVFFlat needs rows to train on, so a failure here is not fatal
        let index = format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_embedding ON {table} USING ivfflat (embedding vector_cosine_ops)",
            table = self.config.table_name
        );
        if let Err(e) = sqlx::query(&index).execute(&self.pool).await {
            tracing::warn!(error = %e, "Skipping vector index creation");
        }

        Ok(())
    }
}
