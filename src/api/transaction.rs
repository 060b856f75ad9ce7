//! Per-request transaction lifecycle.
//!
//! [`transaction_layer`] begins a transaction before the handler runs and
//! places it in the request extensions as a [`RequestTransaction`]. Once the
//! handler has produced a response, the transaction is committed when the
//! status is below 400 and rolled back otherwise.
//!
//! ```text
//! request ─► begin ─► handler ─► status < 400 ─► commit ─► response
//!                          └───► status >= 400 ─► rollback ─► response
//! ```

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use sqlx::{Any, Transaction};
use tokio::sync::{Mutex, OwnedMappedMutexGuard, OwnedMutexGuard};

use super::error::{ApiErrorResponse, ErrorDetail};
use super::handlers::AppState;

type Slot = Option<Transaction<'static, Any>>;

/// Exclusive access to the open transaction of a request.
pub type TransactionGuard = OwnedMappedMutexGuard<Slot, Transaction<'static, Any>>;

/// The transaction owned by the current request.
///
/// Cloning shares the same transaction. The slot is emptied when the
/// request is settled, after which [`acquire`](Self::acquire) fails.
#[derive(Clone)]
pub struct RequestTransaction {
    slot: Arc<Mutex<Slot>>,
}

impl fmt::Debug for RequestTransaction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RequestTransaction")
            .finish_non_exhaustive()
    }
}

impl RequestTransaction {
    #[must_use]
    pub fn new(transaction: Transaction<'static, Any>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(transaction))),
        }
    }

    /// Locks the transaction for the duration of the returned guard.
    ///
    /// The guard owns its share of the slot, so handler futures holding it
    /// across awaits stay `Send`. It dereferences to the transaction, which
    /// in turn dereferences to the connection the store functions take.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the request has already been settled.
    pub async fn acquire(&self) -> Result<TransactionGuard, ApiErrorResponse> {
        let guard = Arc::clone(&self.slot).lock_owned().await;
        OwnedMutexGuard::try_map(guard, Option::as_mut).map_err(|_| {
            ApiErrorResponse::internal_error("Request transaction is no longer open")
        })
    }

    /// Commits or rolls back according to `response`'s status.
    ///
    /// A failed commit replaces the response with an error envelope.
    pub async fn settle(&self, response: Response) -> Response {
        let Some(transaction) = self.slot.lock().await.take() else {
            return response;
        };

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            log_failure(&response);
            if let Err(error) = transaction.rollback().await {
                tracing::error!(%error, "Failed to roll back request transaction");
            }
            return response;
        }

        match transaction.commit().await {
            Ok(()) => {
                tracing::debug!(status = status.as_u16(), "Request transaction committed");
                response
            }
            Err(error) => {
                tracing::error!(%error, "Failed to commit request transaction");
                ApiErrorResponse::internal_error(format!("Failed to commit transaction: {error}"))
                    .into_response()
            }
        }
    }
}

fn log_failure(response: &Response) {
    let status = response.status().as_u16();
    let (kind, message) = response
        .extensions()
        .get::<ErrorDetail>()
        .map_or((None, ""), |detail| (Some(detail.kind), detail.message.as_str()));

    if response.status().is_server_error() {
        tracing::error!(status, ?kind, error = message, "Rolling back request transaction");
    } else {
        tracing::warn!(status, ?kind, error = message, "Rolling back request transaction");
    }
}

impl<S> FromRequestParts<S> for RequestTransaction
where
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            ApiErrorResponse::internal_error("Route is not wrapped by the transaction layer")
        })
    }
}

/// Middleware wrapping every `/api` route in a database transaction.
///
/// If no transaction can be started the handler is not run.
pub async fn transaction_layer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let transaction = match state.database.begin().await {
        Ok(transaction) => RequestTransaction::new(transaction),
        Err(error) => {
            tracing::error!(%error, "Failed to begin request transaction");
            return ApiErrorResponse::from(error).into_response();
        }
    };

    request.extensions_mut().insert(transaction.clone());
    let response = next.run(request).await;
    transaction.settle(response).await
}
