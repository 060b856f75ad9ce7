//! API module for HTTP handlers.
//!
//! This module contains route definitions, the response envelope and the
//! per-request transaction layer.

pub mod dto;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod mutation;
pub mod query;
pub mod routes;
pub mod transaction;

pub use dto::{CreateTaskRequest, CreateTodoRequest, TaskKey, TodoKey};
pub use envelope::{Empty, Envelope, ResponseStatus};
pub use error::{ApiErrorResponse, ApiResult, ErrorDetail, ErrorKind};
pub use extract::{ApiJson, ApiPath};
pub use handlers::{AppState, HealthResponse, health_check};
pub use mutation::{
    create_task, create_todo, delete_task, delete_todo, update_task_field, update_todo_field,
};
pub use query::{
    get_task, get_task_by_archived, list_pinned_todos, list_tasks, list_tasks_by_archived,
};
pub use routes::{api_routes, router};
pub use transaction::{RequestTransaction, transaction_layer};
