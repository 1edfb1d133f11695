//! Submission Error Types
//!
//! Workflow errors and their mapping onto the unified
//! `kernel::error::AppError` problem responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Submission-specific result type alias
pub type SubmissionResult<T> = Result<T, SubmissionError>;

#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Malformed payload, illegal transition, unmet constraint
    #[error("{0}")]
    Validation(String),

    /// No usable credential was presented
    #[error("{0}")]
    Unauthenticated(String),

    /// Credential present but not sufficient
    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SubmissionError {
    pub fn not_found() -> Self {
        SubmissionError::NotFound("Submission not found".to_string())
    }

    pub fn forbidden() -> Self {
        SubmissionError::Authorization("Not allowed to perform this action".to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            SubmissionError::Validation(_) => StatusCode::BAD_REQUEST,
            SubmissionError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            SubmissionError::Authorization(_) => StatusCode::FORBIDDEN,
            SubmissionError::NotFound(_) => StatusCode::NOT_FOUND,
            SubmissionError::Database(_) | SubmissionError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SubmissionError::Validation(_) => ErrorKind::BadRequest,
            SubmissionError::Unauthenticated(_) => ErrorKind::Unauthorized,
            SubmissionError::Authorization(_) => ErrorKind::Forbidden,
            SubmissionError::NotFound(_) => ErrorKind::NotFound,
            SubmissionError::Database(_) | SubmissionError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Both credential failures
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            SubmissionError::Unauthenticated(_) | SubmissionError::Authorization(_)
        )
    }

    fn log(&self) {
        match self {
            SubmissionError::Database(e) => {
                tracing::error!(error = %e, "Submission database error");
            }
            SubmissionError::Internal(msg) => {
                tracing::error!(message = %msg, "Submission internal error");
            }
            SubmissionError::Unauthenticated(_) | SubmissionError::Authorization(_) => {
                tracing::warn!(error = %self, "Submission access denied");
            }
            _ => {
                tracing::debug!(error = %self, "Submission request rejected");
            }
        }
    }
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        AppError::new(err.kind(), err.to_string())
    }
}

impl From<AppError> for SubmissionError {
    fn from(err: AppError) -> Self {
        let message = err.message().to_string();
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity | ErrorKind::Conflict => {
                SubmissionError::Validation(message)
            }
            ErrorKind::Unauthorized => SubmissionError::Unauthenticated(message),
            ErrorKind::Forbidden => SubmissionError::Authorization(message),
            ErrorKind::NotFound => SubmissionError::NotFound(message),
            _ => SubmissionError::Internal(message),
        }
    }
}

impl From<serde_json::Error> for SubmissionError {
    fn from(err: serde_json::Error) -> Self {
        SubmissionError::Internal(format!("document encoding: {err}"))
    }
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        self.log();
        // AppError hides server error details from the body
        AppError::from(self).into_response()
    }
}
