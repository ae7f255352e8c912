//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found. Answered with an empty body.
    NotFound,
    /// Uniqueness conflict
    Conflict(String),
    /// Invalid request (validation error)
    BadRequest(String),
    Internal(String),
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound => return StatusCode::NOT_FOUND.into_response(),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ApiError::new("ALREADY_EXISTS", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Repository(e) => match e {
                RepositoryError::NotFound { .. } => {
                    return StatusCode::NOT_FOUND.into_response();
                }
                RepositoryError::AlreadyExists { message, .. } => {
                    (StatusCode::CONFLICT, ApiError::new("ALREADY_EXISTS", message))
                }
                RepositoryError::ValidationError { message, .. } => {
                    (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", message))
                }
                other => {
                    tracing::error!("repository failure: {}", other);
                    let mut body = ApiError::new("REPOSITORY_ERROR", other.to_string());
                    if let Some(op) = other.context().operation.as_deref() {
                        body = body.with_details(format!("operation: {}", op));
                    }
                    (StatusCode::INTERNAL_SERVER_ERROR, body)
                }
            },
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
