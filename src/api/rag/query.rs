use axum::extract::State;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, QueryRequest, QueryResponse};
use crate::domain::DomainError;

/// `POST /api/query` - answer a question from the indexed documents
pub async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let query = request.query.unwrap_or_default();
    if query.trim().is_empty() {
        return Err(DomainError::EmptyQuery.into());
    }

    debug!(chars = query.len(), "Answering query");

    let answer = state.answer(&query).await?;

    Ok(Json(QueryResponse { answer }))
}
