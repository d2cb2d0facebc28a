//! Supabase (PostgREST) vector store implementation
//!
//! Writes go to `POST {url}/rest/v1/{table}` and searches call the
//! `match_documents` remote procedure, which must exist on the server.

use async_trait::async_trait;
use serde_json::json;

use crate::domain::vector_store::{check_dimensions, ScoredChunk, StoredChunk, VectorStore};
use crate::domain::DomainError;
use crate::infrastructure::llm::HttpClientTrait;

/// Vector store reached through a Supabase project's REST API
#[derive(Debug)]
pub struct SupabaseVectorStore<C: HttpClientTrait> {
    client: C,
    base_url: String,
    api_key: String,
    auth_header: String,
    table: String,
    match_function: String,
    dimensions: Option<usize>,
}

impl<C: HttpClientTrait> SupabaseVectorStore<C> {
    pub fn new(client: C, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        let auth_header = format!("Bearer {}", api_key);

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            auth_header,
            table: "documents".to_string(),
            match_function: "match_documents".to_string(),
            dimensions: None,
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn rpc_url(&self) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, self.match_function)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("apikey", self.api_key.as_str()),
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }
}

#[async_trait]
impl<C: HttpClientTrait> VectorStore for SupabaseVectorStore<C> {
    fn store_type(&self) -> &'static str {
        "supabase"
    }

    async fn store(&self, entries: Vec<StoredChunk>) -> Result<usize, DomainError> {
        for entry in &entries {
            check_dimensions(self.dimensions, entry.dimensions())?;
        }

        let body = serde_json::to_value(&entries)
            .map_err(|e| DomainError::store(format!("Failed to encode rows: {}", e)))?;

        let mut headers = self.headers();
        headers.push(("Prefer", "return=minimal"));

        self.client
            .post_json(&self.table_url(), headers, &body)
            .await
            .map_err(DomainError::into_store)?;

        Ok(entries.len())
    }

    async fn similarity_search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>, DomainError> {
        check_dimensions(self.dimensions, query_embedding.len())?;

        let body = json!({
            "query_embedding": query_embedding,
            "match_count": top_k,
        });

        let response = self
            .client
            .post_json(&self.rpc_url(), self.headers(), &body)
            .await
            .map_err(DomainError::into_store)?;

        if response.is_null() {
            return Ok(Vec::new());
        }

        serde_json::from_value(response)
            .map_err(|e| DomainError::store(format!("Unexpected match_documents result: {}", e)))
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        let url = format!("{}?select=id&limit=1", self.table_url());
        self.client
            .get_json(&url, self.headers())
            .await
            .map_err(DomainError::into_store)?;
        Ok(true)
    }
}
