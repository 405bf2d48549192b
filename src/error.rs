// Error handling module for the admin API
// Provides centralized error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::auth::AuthError;

/// Main error type for the API
/// All handlers should return Result<T, ApiError>
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Field-level validation errors from the validator crate
    /// Maps to HTTP 400 Bad Request
    #[error("validation failed: {0}")]
    ValidationError(validator::ValidationErrors),

    /// Malformed body or otherwise unusable request
    /// Maps to HTTP 400 Bad Request
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Resource not found by ID
    /// Maps to HTTP 404 Not Found
    #[error("{resource} with id {id} not found")]
    NotFound { resource: String, id: String },

    /// Unique-key conflict
    /// Maps to HTTP 409 Conflict
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// Database operation errors
    /// Maps to HTTP 500; details stay in the server log
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// Internal server errors
    /// Maps to HTTP 500; details stay in the server log
    #[error("internal error: {0}")]
    InternalError(String),

    /// Authentication, authorization and credential errors
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Consistent error response structure
///
/// `error` carries the human-readable message; `error_code` is the
/// machine-readable counterpart.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub timestamp: String,
}

impl ErrorResponse {
    fn new(error_code: &str, message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            error_code: error_code.to_string(),
            details: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        ApiError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    /// Convert ApiError to HTTP status code and ErrorResponse
    ///
    /// 500-level errors are logged in full and answered with a generic message.
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let status = self.status_code();
        match self {
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);
                let mut response = ErrorResponse::new("VALIDATION_ERROR", "Request validation failed");
                response.details = serde_json::to_value(errors).ok();
                (status, response)
            }
            ApiError::BadRequest(message) => {
                debug!("Bad request: {}", message);
                (status, ErrorResponse::new("BAD_REQUEST", message.clone()))
            }
            ApiError::NotFound { resource, id } => {
                debug!("Resource not found: {} with id {}", resource, id);
                (
                    status,
                    ErrorResponse::new("NOT_FOUND", format!("{} with id {} not found", resource, id)),
                )
            }
            ApiError::Conflict { message } => {
                warn!("Conflict error: {}", message);
                (status, ErrorResponse::new("CONFLICT", message.clone()))
            }
            ApiError::DatabaseError(db_error) => {
                error!("Database error: {:?}", db_error);
                (status, ErrorResponse::new("DATABASE_ERROR", "A database error occurred"))
            }
            ApiError::InternalError(internal_msg) => {
                error!("Internal error: {}", internal_msg);
                (status, ErrorResponse::new("INTERNAL_ERROR", "An internal server error occurred"))
            }
            ApiError::Auth(auth_error) => {
                let code = match auth_error.status_code() {
                    StatusCode::UNAUTHORIZED => "UNAUTHORIZED",
                    StatusCode::FORBIDDEN => "FORBIDDEN",
                    StatusCode::NOT_FOUND => "NOT_FOUND",
                    StatusCode::BAD_REQUEST => "VALIDATION_ERROR",
                    _ => "INTERNAL_ERROR",
                };
                auth_error.log();
                (status, ErrorResponse::new(code, auth_error.error_message()))
            }
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(auth_error) => auth_error.status_code(),
        }
    }
}

/// Convert validator errors to ApiError
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors)
    }
}
