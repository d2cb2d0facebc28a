//! API error envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::domain::DomainError;

/// Error categories reported in the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    NotSupportedError,
    ServerError,
    TimeoutError,
    ServiceUnavailableError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::NotSupportedError => write!(f, "not_supported_error"),
            Self::ServerError => write!(f, "server_error"),
            Self::TimeoutError => write!(f, "timeout_error"),
            Self::ServiceUnavailableError => write!(f, "service_unavailable_error"),
        }
    }
}

/// Error response body: `{"error": {"message", "type"}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    code: None,
                },
            },
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError, message)
    }

    /// Input the service understands but deliberately does not handle
    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::NotSupportedError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, ApiErrorType::TimeoutError, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            ApiErrorType::ServiceUnavailableError,
            message,
        )
    }

    pub fn message(&self) -> &str {
        &self.response.error.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

/// Client errors carry their own message. Remote and server failures are
/// logged in full and answered with a generic message.
impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        if err.is_client_error() {
            return Self::bad_request(err.to_string());
        }

        match &err {
            DomainError::Timeout { operation, .. } => {
                warn!(operation = %operation, error = %err, "Deadline exceeded");
                Self::timeout("The request took too long to complete")
            }
            DomainError::PartialIngestion {
                indexed,
                total,
                source,
            } if matches!(**source, DomainError::Timeout { .. }) => {
                warn!(error = %err, "Ingestion deadline exceeded");
                Self::timeout(format!(
                    "Timed out after {} of {} chunks were stored",
                    indexed, total
                ))
                .with_code("partial_ingestion")
            }
            DomainError::PartialIngestion { indexed, total, .. } => {
                error!(error = %err, "Ingestion failed");
                Self::internal(format!(
                    "Indexing failed after {} of {} chunks were stored",
                    indexed, total
                ))
                .with_code("partial_ingestion")
            }
            DomainError::Embedding { .. } => {
                error!(error = %err, "Embedding failed");
                Self::internal("Internal server error while embedding").with_code("embedding_error")
            }
            DomainError::Store { .. } => {
                error!(error = %err, "Vector store failed");
                Self::internal("Internal server error while accessing the vector store")
                    .with_code("store_error")
            }
            DomainError::Generation { .. } => {
                error!(error = %err, "Generation failed");
                Self::internal("Internal server error while generating the answer")
                    .with_code("generation_error")
            }
            _ => {
                error!(error = %err, "Request failed");
                Self::internal("Internal server error")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}
