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
    /// Optional additional details
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
    /// Invalid request (validation error)
    BadRequest(String),
    /// The catalogue cannot be shown this session (missing file, schema gap)
    Unavailable { code: &'static str, message: String },
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
}

impl AppError {
    /// Session-level error for a store that failed to open or validate.
    pub fn unavailable(err: &RepositoryError) -> Self {
        let code = match err {
            RepositoryError::DatabaseNotFound { .. } => "DATABASE_NOT_FOUND",
            RepositoryError::SchemaMismatch { .. } => "SCHEMA_MISMATCH",
            _ => "CATALOGUE_UNAVAILABLE",
        };
        AppError::Unavailable {
            code,
            message: err.session_message(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("BAD_REQUEST", msg),
            ),
            AppError::Unavailable { code, message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::new(code, message),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Repository(e) if e.is_session_fatal() => {
                return AppError::unavailable(&e).into_response();
            }
            AppError::Repository(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("REPOSITORY_ERROR", "Catalogue query failed")
                    .with_details(e.to_string()),
            ),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_database_maps_to_503() {
        let err = AppError::from(RepositoryError::database_not_found("data/DSO.db"));
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_bad_request_maps_to_400() {
        let err = AppError::BadRequest("Month must be between 1 and 12, got 0".to_string());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_query_error_maps_to_500() {
        let err = AppError::from(RepositoryError::query("no such table"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unavailable_codes() {
        match AppError::unavailable(&RepositoryError::schema_mismatch(vec![
            "Missing table: DSO".to_string(),
        ])) {
            AppError::Unavailable { code, message } => {
                assert_eq!(code, "SCHEMA_MISMATCH");
                assert!(message.contains("- Missing table: DSO"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
