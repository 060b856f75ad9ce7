//! Create, update and delete handlers.
//!
//! # Endpoints
//!
//! - `POST /api/create/task` - Insert a task, 201 with `{task_id}`
//! - `POST /api/create/todo` - Insert a todo under an existing task, 201 with `{todo_id}`
//! - `POST /api/update/task/{field}` - Write one task column
//! - `POST /api/update/todo/{field}` - Write one todo column
//! - `DELETE /api/delete/task/{task_id}` - Delete a task row
//! - `DELETE /api/delete/todo/{todo_id}` - Delete a todo row
//!
//! Each handler runs inside the request transaction, so a failure after an
//! earlier statement leaves nothing behind.

use serde::Deserialize;

use super::dto::{
    CreateTaskRequest, CreateTodoRequest, TaskFieldUpdate, TaskKey, TodoFieldUpdate, TodoKey,
};
use super::envelope::Envelope;
use super::error::{ApiErrorResponse, ApiResult};
use super::extract::{ApiJson, ApiPath};
use super::query::TaskPath;
use super::transaction::RequestTransaction;
use crate::domain::{NewTask, NewTodo, TodoId};
use crate::infrastructure::{TaskStore, TodoStore};

/// Path parameters for a single todo.
#[derive(Debug, Deserialize)]
pub struct TodoPath {
    pub todo_id: TodoId,
}

// =============================================================================
// Create
// =============================================================================

/// Inserts a task.
///
/// # Errors
///
/// Fails with 400 on a malformed body or with the store error.
pub async fn create_task(
    transaction: RequestTransaction,
    ApiJson(request): ApiJson<CreateTaskRequest>,
) -> ApiResult<TaskKey> {
    let task = NewTask::from(request);
    let mut connection = transaction.acquire().await?;
    let task_id = TaskStore::insert(&mut connection, &task).await?;

    tracing::info!(%task_id, "Task created");
    Ok(Envelope::created(TaskKey { task_id }))
}

/// Inserts a todo under an existing task.
///
/// # Errors
///
/// Fails with 404 if the parent task does not exist.
pub async fn create_todo(
    transaction: RequestTransaction,
    ApiJson(request): ApiJson<CreateTodoRequest>,
) -> ApiResult<TodoKey> {
    let todo = NewTodo::from(request);
    let mut connection = transaction.acquire().await?;

    if !TaskStore::exists(&mut connection, todo.task_id).await? {
        return Err(ApiErrorResponse::not_found(format!(
            "Task {} not found",
            todo.task_id
        )));
    }

    let todo_id = TodoStore::insert(&mut connection, &todo).await?;

    tracing::info!(%todo_id, task_id = %todo.task_id, "Todo created");
    Ok(Envelope::created(TodoKey { todo_id }))
}

// =============================================================================
// Update
// =============================================================================

/// Writes the column carried by `R` on one task.
///
/// Routed once per field, e.g. `update_task_field::<UpdateTaskTitleRequest>`.
///
/// # Errors
///
/// Fails with 404 if the task does not exist.
pub async fn update_task_field<R: TaskFieldUpdate>(
    transaction: RequestTransaction,
    ApiJson(request): ApiJson<R>,
) -> ApiResult<TaskKey> {
    let (task_id, update) = request.into_parts();
    let mut connection = transaction.acquire().await?;
    TaskStore::update(&mut connection, task_id, &update).await?;
    Ok(Envelope::ok(TaskKey { task_id }))
}

/// Writes the column carried by `R` on one todo.
///
/// # Errors
///
/// Fails with 404 if the todo does not exist.
pub async fn update_todo_field<R: TodoFieldUpdate>(
    transaction: RequestTransaction,
    ApiJson(request): ApiJson<R>,
) -> ApiResult<TodoKey> {
    let (todo_id, update) = request.into_parts();
    let mut connection = transaction.acquire().await?;
    TodoStore::update(&mut connection, todo_id, &update).await?;
    Ok(Envelope::ok(TodoKey { todo_id }))
}

// =============================================================================
// Delete
// =============================================================================

/// Deletes one task. Its todos stay in the `todo` table.
///
/// # Errors
///
/// Fails with 404 if the task does not exist.
pub async fn delete_task(
    transaction: RequestTransaction,
    ApiPath(path): ApiPath<TaskPath>,
) -> ApiResult<TaskKey> {
    let mut connection = transaction.acquire().await?;
    TaskStore::delete(&mut connection, path.task_id).await?;

    tracing::info!(task_id = %path.task_id, "Task deleted");
    Ok(Envelope::ok(TaskKey {
        task_id: path.task_id,
    }))
}

/// Deletes one todo.
///
/// # Errors
///
/// Fails with 404 if the todo does not exist.
pub async fn delete_todo(
    transaction: RequestTransaction,
    ApiPath(path): ApiPath<TodoPath>,
) -> ApiResult<TodoKey> {
    let mut connection = transaction.acquire().await?;
    TodoStore::delete(&mut connection, path.todo_id).await?;

    tracing::info!(todo_id = %path.todo_id, "Todo deleted");
    Ok(Envelope::ok(TodoKey {
        todo_id: path.todo_id,
    }))
}
