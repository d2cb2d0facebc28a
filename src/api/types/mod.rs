//! Request, response and error types for the HTTP API

pub mod error;
pub mod json;
pub mod rag;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use rag::{IngestDocumentRequest, IngestResponse, QueryRequest, QueryResponse};
