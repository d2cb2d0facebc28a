use axum::extract::{Multipart, State};
use bytes::Bytes;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, IngestResponse, Json};
use crate::domain::ingestion::{decode_text, is_pdf_name};

const FILE_FIELD: &str = "file";

/// `POST /api/upload` - index an uploaded text file (multipart field `file`)
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>, ApiError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read file '{}': {}", filename, e)))?;

        upload = Some((filename, data));
        break;
    }

    let Some((filename, data)) = upload else {
        return Err(ApiError::bad_request("No file provided"));
    };

    if filename.is_empty() {
        return Err(ApiError::bad_request("Empty file name"));
    }

    if is_pdf_name(&filename) {
        return Err(ApiError::not_supported(
            "PDF files are not supported; upload plain text instead",
        ));
    }

    let content = decode_text(&data);
    debug!(file = %filename, bytes = data.len(), chars = content.len(), "Uploaded file decoded");

    let report = state.ingest(&content, &filename).await?;

    Ok(Json(IngestResponse::new(&filename, report)))
}
