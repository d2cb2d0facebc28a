//! Bodies of the document and query endpoints

use serde::{Deserialize, Serialize};

use crate::domain::IngestionReport;

/// `POST /api/documents`
#[derive(Debug, Clone, Deserialize)]
pub struct IngestDocumentRequest {
    pub name: String,
    pub content: String,
}

/// Successful ingestion, for both JSON and multipart uploads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub message: String,
    pub data: IngestionReport,
}

impl IngestResponse {
    pub fn new(name: &str, data: IngestionReport) -> Self {
        Self {
            message: format!("Document '{}' indexed successfully.", name),
            data,
        }
    }
}

/// `POST /api/query`. A missing query is treated like an empty one.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_response_shape() {
        let response = IngestResponse::new("notes.txt", IngestionReport::new(4, 5120));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["message"], "Document 'notes.txt' indexed successfully.");
        assert_eq!(json["data"]["chunks_indexed"], 4);
        assert_eq!(json["data"]["total_chars"], 5120);
    }

    #[test]
    fn test_query_request_missing_field() {
        let request: QueryRequest = serde_json::from_str("{}").unwrap();
        assert!(request.query.is_none());

        let request: QueryRequest = serde_json::from_str(r#"{"query": null}"#).unwrap();
        assert!(request.query.is_none());
    }
}
