//! Document RAG service
//!
//! Splits documents into overlapping chunks, embeds them, stores the vectors
//! and answers questions from the closest chunks:
//! - Paragraph-packing chunker with character overlap
//! - Gemini and OpenAI embedding and generation providers
//! - In-memory, pgvector and Supabase vector stores

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use tracing::info;

use api::state::AppState;
use infrastructure::{
    embedding::EmbeddingProviderFactory,
    ingestion::IngestionPipeline,
    llm::{HttpClient, LlmProviderFactory},
    retrieval::RetrievalPipeline,
    vector_store::VectorStoreFactory,
};

/// Build the providers, the store and both pipelines from configuration
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let http_client = HttpClient::with_timeout(config.remote.request_timeout())?;

    let embedder = EmbeddingProviderFactory::create(&config.embedding, http_client.clone())?;
    info!(
        provider = embedder.provider_name(),
        model = embedder.model(),
        dimensions = ?embedder.dimensions(),
        "Embedding provider ready"
    );

    let generator = LlmProviderFactory::create(&config.generation, http_client.clone())?;
    info!(
        provider = generator.provider_name(),
        model = generator.model(),
        "Generation provider ready"
    );

    let store = VectorStoreFactory::create(&config.store, embedder.dimensions(), http_client).await?;
    info!(store = store.store_type(), "Vector store ready");

    let ingestion = IngestionPipeline::new(embedder.clone(), store.clone());
    let retrieval =
        RetrievalPipeline::new(embedder, store.clone(), generator).with_top_k(config.retrieval.top_k);

    Ok(AppState::new(ingestion, retrieval, store).with_deadline(config.remote.operation_deadline()))
}
