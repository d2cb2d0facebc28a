use serde::Serialize;

use crate::domain::vector_store::ScoredChunk;

/// Separator placed between retrieved chunks in the generation context
pub const CONTEXT_DELIMITER: &str = "\n---\n";

/// Number of chunks requested from the store per query
pub const DEFAULT_TOP_K: usize = 50;

/// Ranked chunks for a query and the context string built from them
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalContext {
    pub query: String,
    pub chunks: Vec<ScoredChunk>,
    pub context: String,
}

impl RetrievalContext {
    /// Join chunk contents in ranked order
    pub fn from_ranked(query: impl Into<String>, chunks: Vec<ScoredChunk>) -> Self {
        let context = chunks
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_DELIMITER);

        Self {
            query: query.into(),
            chunks,
            context,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.context.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }
}
