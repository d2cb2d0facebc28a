//! CLI module
//!
//! Subcommands:
//! - `serve`: HTTP API server
//! - `ingest`: index a local text file
//! - `query`: answer a single question from the indexed documents

pub mod ingest;
pub mod query;
pub mod serve;

use anyhow::bail;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::vector_store::VectorStoreType;

/// Document RAG service - index documents and ask questions about them
#[derive(Parser)]
#[command(name = "doc-rag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Chunk, embed and store a local text file
    Ingest(ingest::IngestArgs),

    /// Answer a question from the indexed documents
    Query(query::QueryArgs),
}

/// One-shot commands need a store that outlives the process
fn require_persistent_store(config: &AppConfig) -> anyhow::Result<()> {
    if config.store.store_type == VectorStoreType::InMemory {
        bail!(
            "store.type is in_memory, which is discarded when this command exits; \
             set store.type to pgvector or supabase"
        );
    }
    Ok(())
}
