//! Vector store implementations

mod factory;
mod in_memory;
mod pgvector;
mod supabase;

pub use factory::{VectorStoreConfig, VectorStoreFactory, VectorStoreType};
pub use in_memory::InMemoryVectorStore;
pub use pgvector::{PgvectorConfig, PgvectorStore};
pub use supabase::SupabaseVectorStore;
