//! Observability infrastructure - Prometheus metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    create_metrics_router, init_metrics, record_chunks_indexed, record_http_request,
    record_ingestion_failure, record_query, record_remote_call, PrometheusMetrics, QueryOutcome,
    RemoteCall,
};
