//! Document ingestion and question answering endpoints

pub mod documents;
pub mod query;
pub mod upload;

use axum::{routing::post, Router};

use crate::api::state::AppState;

/// Routes mounted under `/api`
pub fn create_rag_router() -> Router<AppState> {
    Router::new()
        .route("/documents", post(documents::ingest_document))
        .route("/upload", post(upload::upload_file))
        .route("/query", post(query::query))
}
