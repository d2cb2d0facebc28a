use std::time::Duration;

use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Document content is empty")]
    EmptyContent,

    #[error("Query is empty")]
    EmptyQuery,

    #[error("Embedding error: {provider} - {message}")]
    Embedding { provider: String, message: String },

    #[error("Vector store error: {message}")]
    Store { message: String },

    #[error("Generation error: {provider} - {message}")]
    Generation { provider: String, message: String },

    #[error("Timed out after {elapsed_ms}ms: {operation}", elapsed_ms = .elapsed.as_millis())]
    Timeout { operation: String, elapsed: Duration },

    #[error("Indexed {indexed} of {total} chunks before failure: {source}")]
    PartialIngestion {
        indexed: usize,
        total: usize,
        #[source]
        source: Box<DomainError>,
    },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DomainError {
    pub fn embedding(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Embedding {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    pub fn generation(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Generation {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, elapsed: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed,
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn partial_ingestion(indexed: usize, total: usize, source: DomainError) -> Self {
        Self::PartialIngestion {
            indexed,
            total,
            source: Box::new(source),
        }
    }

    /// Whether the caller sent bad input, as opposed to a server or remote failure
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyContent | Self::EmptyQuery | Self::Validation { .. }
        )
    }

    /// Reclassify a transport-level failure as an embedding failure.
    ///
    /// Timeouts and errors that are already classified pass through unchanged.
    pub fn into_embedding(self, provider: &str) -> Self {
        match self {
            Self::Provider { message, .. } => Self::embedding(provider, message),
            other => other,
        }
    }

    /// Reclassify a transport-level failure as a generation failure.
    pub fn into_generation(self, provider: &str) -> Self {
        match self {
            Self::Provider { message, .. } => Self::generation(provider, message),
            other => other,
        }
    }

    /// Reclassify a transport-level failure as a store failure.
    pub fn into_store(self) -> Self {
        match self {
            Self::Provider { provider, message } => Self::store(format!("{}: {}", provider, message)),
            other => other,
        }
    }
}
