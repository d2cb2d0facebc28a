//! Document ingestion infrastructure
//!
//! This module provides the paragraph chunker and the ingestion pipeline.

pub mod chunkers;
pub mod pipeline;

pub use chunkers::ParagraphChunker;
pub use pipeline::IngestionPipeline;
