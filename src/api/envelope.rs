//! Response envelope shared by every endpoint.
//!
//! ```json
//! { "data": { ... }, "response": { "status": 200 } }
//! { "data": {}, "response": { "status": 404, "error": "Task 7 not found" } }
//! ```
//!
//! The HTTP status of the response always equals `response.status`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Status block of the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStatus {
    /// HTTP status code, duplicated from the transport.
    pub status: u16,
    /// Error text, present only on failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Payload used where an endpoint has nothing to return; serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// The `{data, response}` wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    pub response: ResponseStatus,
}

impl<T> Envelope<T> {
    /// Wraps `data` with a success status.
    #[must_use]
    pub const fn new(status: StatusCode, data: T) -> Self {
        Self {
            data,
            response: ResponseStatus {
                status: status.as_u16(),
                error: None,
            },
        }
    }

    /// 200 OK.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self::new(StatusCode::OK, data)
    }

    /// 201 Created.
    #[must_use]
    pub const fn created(data: T) -> Self {
        Self::new(StatusCode::CREATED, data)
    }

    /// The HTTP status this envelope is sent with.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl Envelope<Empty> {
    /// An empty-data envelope carrying an error message.
    #[must_use]
    pub fn failure(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            data: Empty {},
            response: ResponseStatus {
                status: status.as_u16(),
                error: Some(error.into()),
            },
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
