//! Shared application state and the health endpoint.

use axum::Json;

use crate::infrastructure::Database;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Pool every request transaction is drawn from.
    pub database: Database,
}

impl AppState {
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }
}

// =============================================================================
// GET /health Handler
// =============================================================================

/// Health check response body.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Health check endpoint.
///
/// Served outside the transaction layer, so it answers without touching
/// the database.
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
