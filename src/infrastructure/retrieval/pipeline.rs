//! Retrieval pipeline: embed the query, search, generate a grounded answer

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::domain::retrieval::{
    build_generation_request, RetrievalContext, DEFAULT_TOP_K, FALLBACK_ANSWER,
};
use crate::domain::{DomainError, EmbeddingProvider, LlmProvider, VectorStore};
use crate::infrastructure::observability::{
    record_query, record_remote_call, QueryOutcome, RemoteCall,
};

/// Answers questions from the chunks held in a vector store
#[derive(Debug, Clone)]
pub struct RetrievalPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    generator: Arc<dyn LlmProvider>,
    top_k: usize,
}

impl RetrievalPipeline {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        generator: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            embedder,
            store,
            generator,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Embed the query and collect the ranked context, without generating
    pub async fn retrieve(&self, query: &str) -> Result<RetrievalContext, DomainError> {
        if query.trim().is_empty() {
            return Err(DomainError::EmptyQuery);
        }

        let started = Instant::now();
        let embedded = self.embedder.embed(query).await;
        record_remote_call(
            RemoteCall::Embedding,
            self.embedder.provider_name(),
            started.elapsed(),
            embedded.is_ok(),
        );
        let embedding = embedded.map_err(|e| as_generation_failure(e, self.embedder.provider_name()))?;

        let started = Instant::now();
        let searched = self.store.similarity_search(&embedding, self.top_k).await;
        record_remote_call(
            RemoteCall::StoreSearch,
            self.store.store_type(),
            started.elapsed(),
            searched.is_ok(),
        );
        let chunks = searched?;

        debug!(results = chunks.len(), top_k = self.top_k, "Context retrieved");

        Ok(RetrievalContext::from_ranked(query, chunks))
    }

    /// Answer `query` from stored context.
    ///
    /// Returns the fixed fallback answer without calling the generator when
    /// nothing was retrieved. The generated text is returned unmodified.
    pub async fn answer(&self, query: &str) -> Result<String, DomainError> {
        let result = self.answer_inner(query).await;

        if result.is_err() {
            record_query(QueryOutcome::Failed);
        }

        result
    }

    /// Like [`answer`](Self::answer) but aborts with `Timeout` once `deadline` elapses
    pub async fn answer_with_deadline(
        &self,
        query: &str,
        deadline: Duration,
    ) -> Result<String, DomainError> {
        match timeout(deadline, self.answer(query)).await {
            Ok(result) => result,
            Err(_) => {
                record_query(QueryOutcome::Failed);
                Err(DomainError::timeout("answer query", deadline))
            }
        }
    }

    async fn answer_inner(&self, query: &str) -> Result<String, DomainError> {
        let context = self.retrieve(query).await?;

        if context.is_empty() {
            info!("No relevant context found, returning fallback answer");
            record_query(QueryOutcome::Fallback);
            return Ok(FALLBACK_ANSWER.to_string());
        }

        let request = build_generation_request(&context.context, query);

        let started = Instant::now();
        let generated = self.generator.chat(request).await;
        record_remote_call(
            RemoteCall::Generation,
            self.generator.provider_name(),
            started.elapsed(),
            generated.is_ok(),
        );
        let response = generated.map_err(|e| as_generation_failure(e, self.generator.provider_name()))?;

        info!(
            chunks = context.len(),
            model = %response.model,
            "Query answered"
        );
        record_query(QueryOutcome::Answered);

        Ok(response.content().to_string())
    }
}

/// Remote failures on the answer path are reported as generation failures
fn as_generation_failure(error: DomainError, provider: &str) -> DomainError {
    match error {
        DomainError::Embedding { provider, message } => {
            warn!(provider = %provider, error = %message, "Query embedding failed");
            DomainError::generation(provider, message)
        }
        other => other.into_generation(provider),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::llm::{MessageRole, MockLlmProvider};
    use crate::domain::retrieval::build_system_prompt;
    use crate::domain::vector_store::MockVectorStore;
    use crate::domain::ScoredChunk;

    fn pipeline(
        store: Arc<MockVectorStore>,
        generator: Arc<MockLlmProvider>,
    ) -> RetrievalPipeline {
        RetrievalPipeline::new(Arc::new(MockEmbeddingProvider::new(8)), store, generator)
    }

    #[tokio::test]
    async fn test_empty_store_returns_fallback_without_generation() {
        let store = Arc::new(MockVectorStore::new());
        let generator = Arc::new(MockLlmProvider::new().with_reply("should not be used"));
        let pipeline = pipeline(store.clone(), generator.clone());

        let answer = pipeline.answer("unrelated query").await.unwrap();

        assert_eq!(answer, FALLBACK_ANSWER);
        assert_eq!(generator.call_count(), 0);
        assert_eq!(store.search_calls(), 1);
    }

    #[tokio::test]
    async fn test_context_passed_in_rank_order() {
        let store = Arc::new(MockVectorStore::new().with_search_results(vec![
            ScoredChunk::new("Point 1: wash hands", 0.92),
            ScoredChunk::new("Point 7: lock the door", 0.81),
            ScoredChunk::new("Unrelated trivia", 0.40),
        ]));
        let generator = Arc::new(MockLlmProvider::new().with_reply("Punkt 1 og 7 fundet."));
        let pipeline = pipeline(store, generator.clone());

        let answer = pipeline.answer("Which points apply?").await.unwrap();

        assert_eq!(answer, "Punkt 1 og 7 fundet.");
        assert_eq!(generator.call_count(), 1);

        let request = generator.last_request().unwrap();
        assert_eq!(request.messages.len(), 2);
        assert!(request.messages.iter().all(|m| m.role == MessageRole::User));

        let expected_context =
            "Point 1: wash hands\n---\nPoint 7: lock the door\n---\nUnrelated trivia";
        assert_eq!(request.messages[0].content, build_system_prompt(expected_context));
        assert_eq!(request.messages[1].content, "Which points apply?");
    }

    #[tokio::test]
    async fn test_answer_returned_verbatim() {
        let reply = "  Svar med mellemrum\n\n- punkt A\n";
        let store = Arc::new(
            MockVectorStore::new().with_search_results(vec![ScoredChunk::new("ctx", 0.5)]),
        );
        let pipeline = pipeline(store, Arc::new(MockLlmProvider::new().with_reply(reply)));

        assert_eq!(pipeline.answer("q").await.unwrap(), reply);
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let store = Arc::new(MockVectorStore::new());
        let pipeline = pipeline(store.clone(), Arc::new(MockLlmProvider::new()));

        for query in ["", "   "] {
            let err = pipeline.answer(query).await.unwrap_err();
            assert!(matches!(err, DomainError::EmptyQuery));
            assert!(err.is_client_error());
        }
        assert_eq!(store.search_calls(), 0);
    }

    #[tokio::test]
    async fn test_search_uses_top_k() {
        let results: Vec<ScoredChunk> =
            (0..80).map(|i| ScoredChunk::new(format!("c{}", i), 1.0)).collect();
        let store = Arc::new(MockVectorStore::new().with_search_results(results));
        let pipeline = pipeline(store, Arc::new(MockLlmProvider::new()));

        let context = pipeline.retrieve("q").await.unwrap();
        assert_eq!(pipeline.top_k(), 50);
        assert_eq!(context.len(), 50);

        let context = pipeline.clone().with_top_k(3).retrieve("q").await.unwrap();
        assert_eq!(context.context, "c0\n---\nc1\n---\nc2");
    }

    #[tokio::test]
    async fn test_generation_failure() {
        let store = Arc::new(
            MockVectorStore::new().with_search_results(vec![ScoredChunk::new("ctx", 0.5)]),
        );
        let pipeline = pipeline(store, Arc::new(MockLlmProvider::new().with_error("HTTP 503")));

        let err = pipeline.answer("q").await.unwrap_err();

        assert!(matches!(err, DomainError::Generation { .. }));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn test_embedding_failure_reported_as_generation_failure() {
        let pipeline = RetrievalPipeline::new(
            Arc::new(MockEmbeddingProvider::new(8).with_error("HTTP 401")),
            Arc::new(MockVectorStore::new()),
            Arc::new(MockLlmProvider::new()),
        );

        let err = pipeline.answer("q").await.unwrap_err();

        match err {
            DomainError::Generation { provider, message } => {
                assert_eq!(provider, "mock");
                assert_eq!(message, "HTTP 401");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_store_error() {
        let store = Arc::new(MockVectorStore::new().failing_search());
        let generator = Arc::new(MockLlmProvider::new());
        let pipeline = pipeline(store, generator.clone());

        let err = pipeline.answer("q").await.unwrap_err();

        assert!(matches!(err, DomainError::Store { .. }));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let pipeline = RetrievalPipeline::new(
            Arc::new(MockEmbeddingProvider::new(8).with_delay(Duration::from_millis(200))),
            Arc::new(MockVectorStore::new()),
            Arc::new(MockLlmProvider::new()),
        );

        let err = pipeline
            .answer_with_deadline("q", Duration::from_millis(20))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Timeout { .. }));
    }
}
