// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error, warn};

use crate::{auth::models::Role, error::ApiError};

/// Client-facing message shared by every token failure
pub const UNAUTHENTICATED_MESSAGE: &str = "Invalid or missing authentication token";

/// Authentication and authorization error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    // Authentication errors
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Missing authentication token")]
    MissingToken,

    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("User {0} not found")]
    UserNotFound(i32),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Password hashing error: {0}")]
    PasswordHashError(String),

    #[error("Invalid password: {0}")]
    InvalidPasswordFormat(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    // Authorization errors
    /// Token is valid but its role is outside the route's allow-list
    #[error("Insufficient permissions: role '{actual}' not in {allowed:?}")]
    InsufficientPermissions { allowed: Vec<Role>, actual: Role },

    #[error("Invalid role: {0}")]
    InvalidRole(String),
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::DatabaseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AuthError::ValidationError(errors.to_string())
    }
}

/// Answers with the same `{error, error_code, timestamp}` body as [`ApiError`]
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::Auth(self).into_response()
    }
}

impl AuthError {
    /// Log at a level matching the failure
    pub fn log(&self) {
        match self {
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::InsufficientPermissions { .. } => {
                debug!("Rejected request: {}", self);
            }
            AuthError::InvalidCredentials => {
                warn!("Failed login attempt");
            }
            AuthError::DatabaseError(_)
            | AuthError::PasswordHashError(_)
            | AuthError::TokenGenerationError(_) => {
                error!("Internal auth error: {}", self);
            }
            _ => debug!("Auth error: {}", self),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::EmailAlreadyExists => StatusCode::BAD_REQUEST,
            AuthError::UserNotFound(_) => StatusCode::NOT_FOUND,
            AuthError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::PasswordHashError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::InvalidPasswordFormat(_) => StatusCode::BAD_REQUEST,
            AuthError::TokenGenerationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::InsufficientPermissions { .. } => StatusCode::FORBIDDEN,
            AuthError::InvalidRole(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to send to clients
    ///
    /// Token failures all read the same, and permission failures do not
    /// reveal which roles would have been accepted.
    pub fn error_message(&self) -> String {
        match self {
            AuthError::ValidationError(msg) => msg.clone(),
            AuthError::InvalidCredentials => "Invalid email or password".to_string(),
            AuthError::InvalidToken | AuthError::ExpiredToken | AuthError::MissingToken => {
                UNAUTHENTICATED_MESSAGE.to_string()
            }
            AuthError::EmailAlreadyExists => "Email already registered".to_string(),
            AuthError::UserNotFound(id) => format!("User with id {} not found", id),
            AuthError::InvalidPasswordFormat(msg) => msg.clone(),
            AuthError::InsufficientPermissions { .. } => "Insufficient permissions".to_string(),
            AuthError::InvalidRole(role) => format!("Invalid role: {}", role),
            AuthError::DatabaseError(_)
            | AuthError::PasswordHashError(_)
            | AuthError::TokenGenerationError(_) => "Internal server error".to_string(),
        }
    }
}
