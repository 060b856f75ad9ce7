//! API error handling.
//!
//! Every failure a handler can produce belongs to one [`ErrorKind`], which
//! fixes its HTTP status. Errors render as an [`Envelope`] with empty data,
//! and also attach an [`ErrorDetail`] extension so the transaction layer can
//! log what went wrong without re-reading the body.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::envelope::Envelope;
use crate::infrastructure::StoreError;

// =============================================================================
// Error Kind
// =============================================================================

/// The closed set of failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The addressed row does not exist.
    NotFound,
    /// The request body or path could not be parsed.
    Validation,
    /// The database refused the write.
    ConstraintViolation,
    /// The database is unreachable.
    Connection,
    /// Anything else raised by the driver.
    Database,
}

impl ErrorKind {
    /// HTTP status for this category.
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::ConstraintViolation => StatusCode::CONFLICT,
            Self::Connection => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// =============================================================================
// API Error Response
// =============================================================================

/// Result type returned by every API handler.
pub type ApiResult<T> = Result<Envelope<T>, ApiErrorResponse>;

/// Response extension describing a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub kind: ErrorKind,
    pub message: String,
}

/// API error response containing status code and error details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Failure category.
    pub kind: ErrorKind,
    /// Text placed in `response.error`.
    pub message: String,
}

impl ApiErrorResponse {
    /// Creates a new API error response.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status: kind.status(),
            kind,
            message: message.into(),
        }
    }

    /// Creates a 400 Bad Request response.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Creates a 404 Not Found response.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Creates a 409 Conflict response.
    #[must_use]
    pub fn constraint_violation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConstraintViolation, message)
    }

    /// Creates a 503 Service Unavailable response.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Connection, message)
    }

    /// Creates a 405 Method Not Allowed response.
    ///
    /// Counted as a validation failure; only the status differs.
    #[must_use]
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::METHOD_NOT_ALLOWED,
            ..Self::validation(message)
        }
    }

    /// Creates a 500 Internal Server Error response.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let mut response = Envelope::failure(self.status, self.message.as_str()).into_response();
        response.extensions_mut().insert(ErrorDetail {
            kind: self.kind,
            message: self.message,
        });
        response
    }
}

impl From<StoreError> for ApiErrorResponse {
    fn from(error: StoreError) -> Self {
        let kind = match &error {
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::ConstraintViolation(_) => ErrorKind::ConstraintViolation,
            StoreError::Connection(_) => ErrorKind::Connection,
            StoreError::MissingGeneratedKey(_) | StoreError::Database(_) => ErrorKind::Database,
        };
        Self::new(kind, error.to_string())
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiErrorResponse {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

// =============================================================================
// Tests
// =============================================================================
