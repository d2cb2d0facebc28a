//! Vector store trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::record::{ScoredChunk, StoredChunk};
use crate::domain::DomainError;

/// Persistence and nearest-neighbour search over embedded chunks
///
/// Implementations handle the specific backend (pgvector, PostgREST, memory).
/// Writes are append-only: no upsert, no deduplication.
#[async_trait]
pub trait VectorStore: Send + Sync + Debug {
    /// Get the store type name
    fn store_type(&self) -> &'static str;

    /// Append records, returning how many were written
    async fn store(&self, entries: Vec<StoredChunk>) -> Result<usize, DomainError>;

    /// Return up to `top_k` chunks ranked closest first
    async fn similarity_search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>, DomainError>;

    /// Check if the store is reachable
    async fn health_check(&self) -> Result<bool, DomainError>;

    /// Create the table and match function if the backend supports it
    async fn ensure_schema(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

/// Reject a vector whose dimensionality differs from the store's
pub(crate) fn check_dimensions(expected: Option<usize>, actual: usize) -> Result<(), DomainError> {
    match expected {
        Some(expected) if expected != actual => Err(DomainError::store(format!(
            "embedding has {} dimensions, store expects {}",
            actual, expected
        ))),
        _ if actual == 0 => Err(DomainError::store("embedding is empty")),
        _ => Ok(()),
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock vector store recording every write
    #[derive(Debug, Default)]
    pub struct MockVectorStore {
        written: Mutex<Vec<StoredChunk>>,
        search_results: Mutex<Vec<ScoredChunk>>,
        store_calls: AtomicUsize,
        search_calls: AtomicUsize,
        fail_after: Mutex<Option<usize>>,
        fail_search: AtomicBool,
    }

    impl MockVectorStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Results returned by every search, regardless of the query
        pub fn with_search_results(self, results: Vec<ScoredChunk>) -> Self {
            *self.search_results.lock().unwrap() = results;
            self
        }

        /// Accept the first `calls` store calls, then fail
        pub fn failing_after(self, calls: usize) -> Self {
            *self.fail_after.lock().unwrap() = Some(calls);
            self
        }

        pub fn failing_search(self) -> Self {
            self.fail_search.store(true, Ordering::SeqCst);
            self
        }

        pub fn written(&self) -> Vec<StoredChunk> {
            self.written.lock().unwrap().clone()
        }

        pub fn store_calls(&self) -> usize {
            self.store_calls.load(Ordering::SeqCst)
        }

        pub fn search_calls(&self) -> usize {
            self.search_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VectorStore for MockVectorStore {
        fn store_type(&self) -> &'static str {
            "mock"
        }

        async fn store(&self, entries: Vec<StoredChunk>) -> Result<usize, DomainError> {
            let call = self.store_calls.fetch_add(1, Ordering::SeqCst);

            if let Some(limit) = *self.fail_after.lock().unwrap() {
                if call >= limit {
                    return Err(DomainError::store("mock store unavailable"));
                }
            }

            let count = entries.len();
            self.written.lock().unwrap().extend(entries);
            Ok(count)
        }

        async fn similarity_search(
            &self,
            _query_embedding: &[f32],
            top_k: usize,
        ) -> Result<Vec<ScoredChunk>, DomainError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);

            if self.fail_search.load(Ordering::SeqCst) {
                return Err(DomainError::store("mock store unavailable"));
            }

            Ok(self
                .search_results
                .lock()
                .unwrap()
                .iter()
                .take(top_k)
                .cloned()
                .collect())
        }

        async fn health_check(&self) -> Result<bool, DomainError> {
            Ok(!self.fail_search.load(Ordering::SeqCst))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dimensions() {
        assert!(check_dimensions(Some(3), 3).is_ok());
        assert!(check_dimensions(None, 5).is_ok());
        assert!(matches!(
            check_dimensions(Some(768), 3),
            Err(DomainError::Store { .. })
        ));
        assert!(check_dimensions(None, 0).is_err());
    }

    #[tokio::test]
    async fn test_mock_store_records_writes() {
        let store = mock::MockVectorStore::new();
        let written = store
            .store(vec![StoredChunk::new("k", "c", vec![1.0])])
            .await
            .unwrap();

        assert_eq!(written, 1);
        assert_eq!(store.written().len(), 1);
        assert_eq!(store.store_calls(), 1);
    }
}
