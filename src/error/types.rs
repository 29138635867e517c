use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

pub type AppResult<T> = Result<T, AppError>;

/// Why a document could not be turned into text. Rendered to clients as a
/// fixed sentence; library error text only goes to the logs.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionFailure {
    #[error("the uploaded file is empty")]
    EmptyDocument,

    #[error("the uploaded file is not a PDF document")]
    NotPdf,

    #[error("the document is encrypted")]
    Encrypted,

    #[error("the document is corrupt or unreadable")]
    Malformed,

    #[error("the document could not be processed")]
    Panicked,

    #[error("extraction took too long")]
    TimedOut,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid upload: {message}")]
    InvalidUpload { message: String },

    #[error("Missing file field '{field}'")]
    MissingFile { field: &'static str },

    #[error("File too large: exceeds limit of {limit_mb}MB")]
    PayloadTooLarge { limit_mb: usize },

    #[error("Failed to extract text from PDF: {reason}")]
    ExtractionFailed { reason: ExtractionFailure },

    #[error("Rate limit exceeded: maximum concurrent requests reached")]
    RateLimitExceeded,

    /// The whole request outlived `REQUEST_TIMEOUT_SECONDS`.
    #[error("Request timed out")]
    Timeout,

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            AppError::InvalidUpload { .. } => "INVALID_UPLOAD",
            AppError::MissingFile { .. } => "MISSING_FILE",
            AppError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            AppError::ExtractionFailed { .. } => "EXTRACTION_FAILED",
            AppError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            AppError::Timeout => "REQUEST_TIMEOUT",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::InvalidUpload { .. } => StatusCode::BAD_REQUEST,
            AppError::MissingFile { .. } => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::ExtractionFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            AppError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message a client sees. Internal details are withheld.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Internal { .. } => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if status.is_server_error() {
            tracing::error!(
                error_code = error_code,
                status_code = %status,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::warn!(
                error_code = error_code,
                status_code = %status,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = Json(ErrorResponse {
            error: self.public_message(),
            code: error_code.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal {
            message: format!("Extraction task failed: {}", err),
        }
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout
    }
}

impl From<ExtractionFailure> for AppError {
    fn from(reason: ExtractionFailure) -> Self {
        AppError::ExtractionFailed { reason }
    }
}

impl AppError {
    pub fn invalid_upload(message: impl Into<String>) -> Self {
        AppError::InvalidUpload {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal {
            message: message.into(),
        }
    }
}
