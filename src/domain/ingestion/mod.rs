//! Document ingestion domain types and traits
//!
//! This module provides:
//! - `ChunkingStrategy` trait for splitting documents into chunks
//! - `Document` and the storage key scheme for its chunks
//! - `IngestionReport` returned by the ingestion pipeline

pub mod chunker;
pub mod document;

pub use chunker::{Chunk, ChunkMetadata, ChunkingConfig, ChunkingStrategy};
pub use document::{
    chunk_storage_key, decode_text, is_pdf_name, safe_document_name, Document, IngestionReport,
    STORAGE_KEY_PREFIX,
};

#[cfg(test)]
pub use chunker::mock::MockChunkingStrategy;
