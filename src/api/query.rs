//! Read handlers.
//!
//! # Endpoints
//!
//! - `GET|POST /api/get/tasks[/{archived}]` - Tasks filtered by `archived`
//! - `GET|POST /api/get/task/{task_id}[/{archived}]` - One task with its todos
//! - `GET|POST /api/get/todos/pinned` - Pinned todos across all tasks
//!
//! `archived` defaults to `0` when the segment is absent.

use serde::Deserialize;

use super::envelope::Envelope;
use super::error::ApiResult;
use super::extract::ApiPath;
use super::transaction::RequestTransaction;
use crate::domain::{Flag, Task, TaskId, TaskWithTodos, Todo};
use crate::infrastructure::{TaskStore, TodoStore};

// =============================================================================
// Path Extractors
// =============================================================================

/// Path parameters for the archived task listing.
#[derive(Debug, Deserialize)]
pub struct ArchivedPath {
    #[serde(deserialize_with = "Flag::deserialize_segment")]
    pub archived: Flag,
}

/// Path parameters for a single task.
#[derive(Debug, Deserialize)]
pub struct TaskPath {
    pub task_id: TaskId,
}

/// Path parameters for a single task with an explicit todo filter.
#[derive(Debug, Deserialize)]
pub struct TaskArchivedPath {
    pub task_id: TaskId,
    #[serde(deserialize_with = "Flag::deserialize_segment")]
    pub archived: Flag,
}

// =============================================================================
// Tasks
// =============================================================================

/// Lists unarchived tasks.
///
/// # Errors
///
/// Fails with the store error mapped to its status.
pub async fn list_tasks(transaction: RequestTransaction) -> ApiResult<Vec<Task>> {
    load_tasks(&transaction, Flag::UNSET).await
}

/// Lists tasks whose `archived` flag matches the path segment.
///
/// # Errors
///
/// Fails with 400 on a malformed flag, otherwise as [`list_tasks`].
pub async fn list_tasks_by_archived(
    transaction: RequestTransaction,
    ApiPath(path): ApiPath<ArchivedPath>,
) -> ApiResult<Vec<Task>> {
    load_tasks(&transaction, path.archived).await
}

async fn load_tasks(transaction: &RequestTransaction, archived: Flag) -> ApiResult<Vec<Task>> {
    let mut connection = transaction.acquire().await?;
    let tasks = TaskStore::list(&mut connection, archived).await?;
    Ok(Envelope::ok(tasks))
}

/// Fetches one task and its unarchived todos.
///
/// # Errors
///
/// Fails with 404 if the task does not exist.
pub async fn get_task(
    transaction: RequestTransaction,
    ApiPath(path): ApiPath<TaskPath>,
) -> ApiResult<TaskWithTodos> {
    load_task(&transaction, path.task_id, Flag::UNSET).await
}

/// Fetches one task and the todos whose `archived` flag matches the path.
///
/// # Errors
///
/// Fails with 404 if the task does not exist.
pub async fn get_task_by_archived(
    transaction: RequestTransaction,
    ApiPath(path): ApiPath<TaskArchivedPath>,
) -> ApiResult<TaskWithTodos> {
    load_task(&transaction, path.task_id, path.archived).await
}

async fn load_task(
    transaction: &RequestTransaction,
    task_id: TaskId,
    archived: Flag,
) -> ApiResult<TaskWithTodos> {
    let mut connection = transaction.acquire().await?;
    let task = TaskStore::find(&mut connection, task_id).await?;
    let todos = TodoStore::list_for_task(&mut connection, task_id, archived).await?;
    Ok(Envelope::ok(TaskWithTodos { task, todos }))
}

// =============================================================================
// Todos
// =============================================================================

/// Lists every pinned todo.
///
/// # Errors
///
/// Fails with the store error mapped to its status.
pub async fn list_pinned_todos(transaction: RequestTransaction) -> ApiResult<Vec<Todo>> {
    let mut connection = transaction.acquire().await?;
    let todos = TodoStore::list_pinned(&mut connection).await?;
    Ok(Envelope::ok(todos))
}
