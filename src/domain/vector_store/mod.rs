//! Vector store domain - persisted chunks and similarity search

mod record;
mod store;

pub use record::{ScoredChunk, StoredChunk};
pub use store::VectorStore;
pub(crate) use store::check_dimensions;

#[cfg(test)]
pub use store::mock::MockVectorStore;
