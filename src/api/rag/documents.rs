use axum::extract::State;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, IngestDocumentRequest, IngestResponse, Json};

/// `POST /api/documents` - index raw text under a document name
pub async fn ingest_document(
    State(state): State<AppState>,
    Json(request): Json<IngestDocumentRequest>,
) -> Result<Json<IngestResponse>, ApiError> {
    debug!(name = %request.name, chars = request.content.len(), "Ingesting document");

    let report = state.ingest(&request.content, &request.name).await?;

    Ok(Json(IngestResponse::new(&request.name, report)))
}
