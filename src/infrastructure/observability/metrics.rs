//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("doc_rag_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Kind of remote round trip made by the pipelines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCall {
    Embedding,
    StoreWrite,
    StoreSearch,
    Generation,
}

impl RemoteCall {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Embedding => "embedding",
            Self::StoreWrite => "store_write",
            Self::StoreSearch => "store_search",
            Self::Generation => "generation",
        }
    }
}

/// Record the latency and outcome of one remote call
pub fn record_remote_call(call: RemoteCall, backend: &str, duration: Duration, success: bool) {
    let labels = [
        ("call", call.as_str().to_string()),
        ("backend", backend.to_string()),
        ("status", if success { "success" } else { "error" }.to_string()),
    ];

    counter!("rag_remote_calls_total", &labels).increment(1);
    histogram!("rag_remote_call_duration_seconds", &labels).record(duration.as_secs_f64());
}

pub fn record_chunks_indexed(count: usize) {
    counter!("rag_chunks_indexed_total").increment(count as u64);
}

/// Record a failed ingestion; `reason` is a short error class
pub fn record_ingestion_failure(reason: &'static str) {
    counter!("rag_ingestion_failures_total", "reason" => reason).increment(1);
}

/// How a query was answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    Answered,
    Fallback,
    Failed,
}

impl QueryOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Answered => "answered",
            Self::Fallback => "fallback",
            Self::Failed => "failed",
        }
    }
}

pub fn record_query(outcome: QueryOutcome) {
    counter!("rag_queries_total", "outcome" => outcome.as_str()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_call_labels() {
        assert_eq!(RemoteCall::Embedding.as_str(), "embedding");
        assert_eq!(RemoteCall::StoreSearch.as_str(), "store_search");
        assert_eq!(QueryOutcome::Fallback.as_str(), "fallback");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_remote_call(RemoteCall::Generation, "gemini", Duration::from_millis(5), true);
        record_chunks_indexed(3);
        record_ingestion_failure("store");
        record_query(QueryOutcome::Answered);
        record_http_request("POST", "/api/query", 200, Duration::from_millis(12));
    }
}
