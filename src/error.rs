//! Error types for the Library API

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::models::book::ValidationFailure;

/// Application error codes reported in `ErrorResponse`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchBook = 4,
    Duplicate = 5,
    BadValue = 6,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<ValidationFailure>),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Raised by a store when a write violates the primary key.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request body that is not usable JSON at all
    #[error("Bad request: {0}")]
    BadRequest(String),
}

fn summarize(failures: &[ValidationFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.property_name, f.error_message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl AppError {
    /// Single-field validation failure
    pub fn invalid(property_name: &str, error_message: &str) -> Self {
        AppError::Validation(vec![ValidationFailure::new(property_name, error_message)])
    }
}

/// Property named by a serde error such as `pageCount: invalid type: ...`
fn rejected_property(detail: &str) -> Option<&str> {
    let (path, _) = detail.split_once(": ")?;
    let path = path.trim();
    if path.is_empty() || path == "." || path.contains(char::is_whitespace) {
        None
    } else {
        Some(path)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Well-formed JSON with a wrongly typed field
            JsonRejection::JsonDataError(err) => {
                let text = err.body_text();
                let detail = text
                    .split_once("target type: ")
                    .map_or(text.as_str(), |(_, detail)| detail);
                let property = rejected_property(detail).unwrap_or("body");
                AppError::invalid(property, detail)
            }
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            // Validation failures are returned verbatim as the list of field errors.
            AppError::Validation(failures) => {
                tracing::debug!("Rejected request: {}", summarize(&failures));
                return (StatusCode::BAD_REQUEST, Json(failures)).into_response();
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchBook, msg),
            AppError::Constraint(msg) => (StatusCode::CONFLICT, ErrorCode::Duplicate, msg),
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthorized, msg)
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg),
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
