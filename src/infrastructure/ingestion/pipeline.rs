//! Ingestion pipeline: chunk, embed, store

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::timeout;
use tracing::{debug, error, info};

use crate::domain::ingestion::{
    chunk_storage_key, safe_document_name, ChunkingConfig, ChunkingStrategy, Document,
    IngestionReport,
};
use crate::domain::{DomainError, EmbeddingProvider, StoredChunk, VectorStore};
use crate::infrastructure::observability::{
    record_chunks_indexed, record_ingestion_failure, record_remote_call, RemoteCall,
};

use super::chunkers::ParagraphChunker;

/// Turns raw document text into stored, embedded chunks
#[derive(Debug, Clone)]
pub struct IngestionPipeline {
    chunker: Arc<dyn ChunkingStrategy>,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    chunking: ChunkingConfig,
}

impl IngestionPipeline {
    /// Pipeline using the paragraph chunker and the ingestion chunking policy
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            chunker: Arc::new(ParagraphChunker::new()),
            embedder,
            store,
            chunking: ChunkingConfig::ingestion(),
        }
    }

    pub fn with_chunker(mut self, chunker: Arc<dyn ChunkingStrategy>) -> Self {
        self.chunker = chunker;
        self
    }

    pub fn with_chunking_config(mut self, config: ChunkingConfig) -> Self {
        self.chunking = config;
        self
    }

    pub fn chunking_config(&self) -> &ChunkingConfig {
        &self.chunking
    }

    /// Index `content` under `name`.
    ///
    /// Chunks are embedded and stored one at a time in order. If any call
    /// fails the loop stops and the error reports how many chunks were
    /// already written; those writes are not rolled back.
    pub async fn ingest(&self, content: &str, name: &str) -> Result<IngestionReport, DomainError> {
        self.ingest_document(&Document::new(name, content)).await
    }

    pub async fn ingest_document(&self, document: &Document) -> Result<IngestionReport, DomainError> {
        self.ingest_tracked(document, &Progress::default()).await
    }

    /// Like [`ingest`](Self::ingest) but gives up once `deadline` elapses.
    ///
    /// A timeout is reported as `PartialIngestion` wrapping `Timeout`, with
    /// the number of chunks written before the deadline.
    pub async fn ingest_with_deadline(
        &self,
        content: &str,
        name: &str,
        deadline: Duration,
    ) -> Result<IngestionReport, DomainError> {
        let document = Document::new(name, content);
        let progress = Progress::default();

        match timeout(deadline, self.ingest_tracked(&document, &progress)).await {
            Ok(result) => result,
            Err(_) => {
                let (indexed, total) = progress.snapshot();
                error!(
                    document = %name,
                    indexed,
                    total,
                    deadline_ms = deadline.as_millis() as u64,
                    "Ingestion deadline exceeded"
                );
                record_chunks_indexed(indexed);
                record_ingestion_failure("timeout");
                Err(DomainError::partial_ingestion(
                    indexed,
                    total,
                    DomainError::timeout(format!("ingest {}", name), deadline),
                ))
            }
        }
    }

    async fn ingest_tracked(
        &self,
        document: &Document,
        progress: &Progress,
    ) -> Result<IngestionReport, DomainError> {
        if document.is_blank() {
            record_ingestion_failure("empty_content");
            return Err(DomainError::EmptyContent);
        }

        let safe_name = safe_document_name(&document.name);
        let chunks = self.chunker.chunk(&document.content, &self.chunking)?;
        let total = chunks.len();
        progress.total.store(total, Ordering::SeqCst);

        debug!(
            document = %document.name,
            chunker = self.chunker.name(),
            chunks = total,
            "Document chunked"
        );

        for (indexed, chunk) in chunks.into_iter().enumerate() {
            let key = chunk_storage_key(&safe_name, chunk.index());

            if let Err(e) = self.index_chunk(&key, chunk.content).await {
                error!(
                    document = %document.name,
                    key = %key,
                    indexed,
                    total,
                    error = %e,
                    "Ingestion stopped"
                );
                record_chunks_indexed(indexed);
                record_ingestion_failure(failure_reason(&e));
                return Err(DomainError::partial_ingestion(indexed, total, e));
            }

            progress.indexed.fetch_add(1, Ordering::SeqCst);
            debug!(key = %key, "Chunk indexed");
        }

        record_chunks_indexed(total);

        let report = IngestionReport::new(total, document.char_count());
        info!(
            document = %document.name,
            chunks_indexed = report.chunks_indexed,
            total_chars = report.total_chars,
            "Document ingested"
        );

        Ok(report)
    }

    async fn index_chunk(&self, key: &str, content: String) -> Result<(), DomainError> {
        let started = Instant::now();
        let embedded = self.embedder.embed(&content).await;
        record_remote_call(
            RemoteCall::Embedding,
            self.embedder.provider_name(),
            started.elapsed(),
            embedded.is_ok(),
        );
        let embedding = embedded?;

        let started = Instant::now();
        let stored = self
            .store
            .store(vec![StoredChunk::new(key, content, embedding)])
            .await;
        record_remote_call(
            RemoteCall::StoreWrite,
            self.store.store_type(),
            started.elapsed(),
            stored.is_ok(),
        );
        stored.map(|_| ())
    }
}

/// Chunks written so far, readable after the ingest future is dropped
#[derive(Debug, Default)]
struct Progress {
    indexed: AtomicUsize,
    total: AtomicUsize,
}

impl Progress {
    fn snapshot(&self) -> (usize, usize) {
        (
            self.indexed.load(Ordering::SeqCst),
            self.total.load(Ordering::SeqCst),
        )
    }
}

fn failure_reason(error: &DomainError) -> &'static str {
    match error {
        DomainError::Embedding { .. } => "embedding",
        DomainError::Store { .. } => "store",
        DomainError::Timeout { .. } => "timeout",
        _ => "other",
    }
}
