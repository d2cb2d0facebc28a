//! Embedding provider domain models and traits

mod provider;
mod response;

pub use provider::EmbeddingProvider;
pub use response::{cosine_similarity, decode_embedding_value, EmbeddingShape};

#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;
