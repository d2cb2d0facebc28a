//! Domain layer - Core business logic and entities

pub mod embedding;
pub mod error;
pub mod ingestion;
pub mod llm;
pub mod retrieval;
pub mod vector_store;

pub use embedding::EmbeddingProvider;
pub use error::DomainError;
pub use ingestion::{
    Chunk, ChunkMetadata, ChunkingConfig, ChunkingStrategy, Document, IngestionReport,
};
pub use llm::{FinishReason, LlmProvider, LlmRequest, LlmResponse, Message, MessageRole, Usage};
pub use retrieval::RetrievalContext;
pub use vector_store::{ScoredChunk, StoredChunk, VectorStore};
