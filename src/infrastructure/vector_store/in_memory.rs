//! In-memory vector store for development and testing

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::embedding::cosine_similarity;
use crate::domain::vector_store::{check_dimensions, ScoredChunk, StoredChunk, VectorStore};
use crate::domain::DomainError;

/// Brute-force cosine search over chunks held in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryVectorStore {
    dimensions: Option<usize>,
    entries: Arc<RwLock<Vec<StoredChunk>>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject vectors of any other size
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions: Some(dimensions),
            ..Default::default()
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Keys of stored chunks in insertion order
    pub async fn keys(&self) -> Vec<String> {
        self.entries
            .read()
            .await
            .iter()
            .map(|e| e.key.clone())
            .collect()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn store_type(&self) -> &'static str {
        "in_memory"
    }

    async fn store(&self, entries: Vec<StoredChunk>) -> Result<usize, DomainError> {
        let mut stored = self.entries.write().await;
        let mut expected = self
            .dimensions
            .or_else(|| stored.first().map(StoredChunk::dimensions));

        for entry in &entries {
            check_dimensions(expected, entry.dimensions())?;
            expected.get_or_insert(entry.dimensions());
        }

        let count = entries.len();
        stored.extend(entries);
        Ok(count)
    }

    async fn similarity_search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>, DomainError> {
        let entries = self.entries.read().await;

        if entries.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        check_dimensions(
            self.dimensions.or_else(|| entries.first().map(StoredChunk::dimensions)),
            query_embedding.len(),
        )?;

        let mut scored: Vec<ScoredChunk> = entries
            .iter()
            .map(|e| ScoredChunk::new(&e.content, cosine_similarity(query_embedding, &e.embedding)))
            .collect();

        // Stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored)
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        Ok(true)
    }
}
