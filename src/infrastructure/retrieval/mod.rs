//! Retrieval and answer generation

mod pipeline;

pub use pipeline::RetrievalPipeline;
