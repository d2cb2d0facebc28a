//! Application state shared by the handlers

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{DomainError, IngestionReport, VectorStore};
use crate::infrastructure::ingestion::IngestionPipeline;
use crate::infrastructure::retrieval::RetrievalPipeline;

/// Pipelines and the store they share, plus the per-operation deadline
#[derive(Debug, Clone)]
pub struct AppState {
    pub ingestion: Arc<IngestionPipeline>,
    pub retrieval: Arc<RetrievalPipeline>,
    pub store: Arc<dyn VectorStore>,
    pub deadline: Option<Duration>,
}

impl AppState {
    pub fn new(
        ingestion: IngestionPipeline,
        retrieval: RetrievalPipeline,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            ingestion: Arc::new(ingestion),
            retrieval: Arc::new(retrieval),
            store,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub async fn ingest(&self, content: &str, name: &str) -> Result<IngestionReport, DomainError> {
        match self.deadline {
            Some(deadline) => {
                self.ingestion
                    .ingest_with_deadline(content, name, deadline)
                    .await
            }
            None => self.ingestion.ingest(content, name).await,
        }
    }

    pub async fn answer(&self, query: &str) -> Result<String, DomainError> {
        match self.deadline {
            Some(deadline) => self.retrieval.answer_with_deadline(query, deadline).await,
            None => self.retrieval.answer(query).await,
        }
    }
}
