//! Retrieval context assembly and the generation prompt

mod context;
mod prompt;

pub use context::{CONTEXT_DELIMITER, DEFAULT_TOP_K, RetrievalContext};
pub use prompt::{FALLBACK_ANSWER, build_generation_request, build_system_prompt};
