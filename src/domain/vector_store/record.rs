//! Records written to and read from a vector store

use serde::{Deserialize, Serialize};

/// A chunk persisted alongside its embedding.
///
/// Keys are unique by convention (`documents/{safe_name}_{index}`); stores do
/// not enforce uniqueness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredChunk {
    #[serde(rename = "file_path")]
    pub key: String,
    pub content: String,
    pub embedding: Vec<f32>,
}

impl StoredChunk {
    pub fn new(key: impl Into<String>, content: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            key: key.into(),
            content: content.into(),
            embedding,
        }
    }

    /// Get the embedding dimensions
    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }
}

/// A search hit: chunk text plus its similarity to the query (higher is closer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub content: String,
    #[serde(alias = "similarity")]
    pub score: f32,
}

impl ScoredChunk {
    pub fn new(content: impl Into<String>, score: f32) -> Self {
        Self {
            content: content.into(),
            score,
        }
    }
}
