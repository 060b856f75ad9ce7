//! Parameterized SQL for tasks and todos.
//!
//! Every function runs against the caller's connection, which is normally
//! the request transaction, so a handler's statements commit or roll back
//! together. Values are always bound as parameters; column names come only
//! from the fixed statement tables below.

use sqlx::{AnyConnection, Sqlite};
use sqlx::any::AnyQueryResult;
use sqlx::error::ErrorKind;
use thiserror::Error;

use crate::domain::{Flag, NewTask, NewTodo, Task, TaskId, TaskUpdate, Todo, TodoId, TodoUpdate};

// =============================================================================
// Store Error
// =============================================================================

/// Errors that can occur while talking to the database.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No row matched the requested identifier.
    #[error("{0} not found")]
    NotFound(String),

    /// A unique, foreign key, not-null or check constraint rejected the write.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The database could not be reached or the pool is exhausted.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The insert succeeded but the driver reported no generated key.
    #[error("Database did not report a generated key for the new {0}")]
    MissingGeneratedKey(&'static str),

    /// Any other driver error.
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => Self::NotFound("Row".to_string()),
            sqlx::Error::Database(database_error) => match database_error.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => {
                    Self::ConstraintViolation(database_error.message().to_string())
                }
                _ => Self::Database(database_error.to_string()),
            },
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => Self::Connection(error.to_string()),
            other => Self::Database(other.to_string()),
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

// `MySQL` reports TINYINT and TEXT columns with types the `Any` driver cannot
// decode, so flags are widened to integers and text is read back as CHAR.
macro_rules! task_columns {
    () => {
        "task_id, CAST(title AS CHAR) AS title, CAST(description AS CHAR) AS description, \
         color, CAST(archived AS SIGNED) AS archived"
    };
}

macro_rules! todo_columns {
    () => {
        "todo_id, task_id, CAST(text AS CHAR) AS text, CAST(checked AS SIGNED) AS checked, \
         CAST(archived AS SIGNED) AS archived, CAST(pinned AS SIGNED) AS pinned"
    };
}

const SELECT_TASKS_BY_ARCHIVED: &str = concat!(
    "SELECT ",
    task_columns!(),
    " FROM tasks WHERE archived = ? ORDER BY task_id"
);
const SELECT_TASK_BY_ID: &str = concat!("SELECT ", task_columns!(), " FROM tasks WHERE task_id = ?");
const SELECT_TASK_EXISTS: &str = "SELECT 1 FROM tasks WHERE task_id = ?";
const INSERT_TASK: &str = "INSERT INTO tasks (title, description, color) VALUES (?, ?, ?)";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE task_id = ?";

const SELECT_TODOS_BY_TASK: &str = concat!(
    "SELECT ",
    todo_columns!(),
    " FROM todo WHERE task_id = ? AND archived = ? ORDER BY todo_id"
);
const SELECT_PINNED_TODOS: &str = concat!(
    "SELECT ",
    todo_columns!(),
    " FROM todo WHERE pinned = 1 ORDER BY todo_id"
);
const SELECT_TODO_EXISTS: &str = "SELECT 1 FROM todo WHERE todo_id = ?";
const INSERT_TODO: &str = "INSERT INTO todo (task_id, text) VALUES (?, ?)";
const DELETE_TODO: &str = "DELETE FROM todo WHERE todo_id = ?";

const SELECT_SQLITE_ROWID: &str = "SELECT last_insert_rowid()";

const fn task_update_statement(update: &TaskUpdate) -> &'static str {
    match update {
        TaskUpdate::Title(_) => "UPDATE tasks SET title = ? WHERE task_id = ?",
        TaskUpdate::Description(_) => "UPDATE tasks SET description = ? WHERE task_id = ?",
        TaskUpdate::Color(_) => "UPDATE tasks SET color = ? WHERE task_id = ?",
        TaskUpdate::Archived(_) => "UPDATE tasks SET archived = ? WHERE task_id = ?",
    }
}

const fn todo_update_statement(update: &TodoUpdate) -> &'static str {
    match update {
        TodoUpdate::Text(_) => "UPDATE todo SET text = ? WHERE todo_id = ?",
        TodoUpdate::Checked(_) => "UPDATE todo SET checked = ? WHERE todo_id = ?",
        TodoUpdate::Archived(_) => "UPDATE todo SET archived = ? WHERE todo_id = ?",
        TodoUpdate::Pinned(_) => "UPDATE todo SET pinned = ? WHERE todo_id = ?",
    }
}

/// Key of the row `result` inserted.
///
/// The `SQLite` driver never fills `last_insert_id` through `Any`, so the
/// rowid is read back on the same connection instead.
async fn generated_key(
    connection: &mut AnyConnection,
    result: &AnyQueryResult,
    entity: &'static str,
) -> Result<i64, StoreError> {
    if let Some(key) = result.last_insert_id() {
        return Ok(key);
    }

    if connection.backend_name() == <Sqlite as sqlx::Database>::NAME {
        let key: i64 = sqlx::query_scalar(SELECT_SQLITE_ROWID)
            .fetch_one(&mut *connection)
            .await?;
        return Ok(key);
    }

    Err(StoreError::MissingGeneratedKey(entity))
}

// =============================================================================
// Task Store
// =============================================================================

/// Statements over the `tasks` table.
pub struct TaskStore;

impl TaskStore {
    /// Lists tasks whose `archived` flag equals `archived`.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the query fails.
    pub async fn list(
        connection: &mut AnyConnection,
        archived: Flag,
    ) -> Result<Vec<Task>, StoreError> {
        let tasks = sqlx::query_as::<_, Task>(SELECT_TASKS_BY_ARCHIVED)
            .bind(archived.as_i64())
            .fetch_all(&mut *connection)
            .await?;
        Ok(tasks)
    }

    /// Fetches exactly one task.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no row has this id.
    pub async fn find(connection: &mut AnyConnection, task_id: TaskId) -> Result<Task, StoreError> {
        sqlx::query_as::<_, Task>(SELECT_TASK_BY_ID)
            .bind(task_id.as_i64())
            .fetch_optional(&mut *connection)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Task {task_id}")))
    }

    /// Returns whether a task row with this id exists.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the query fails.
    pub async fn exists(connection: &mut AnyConnection, task_id: TaskId) -> Result<bool, StoreError> {
        let row = sqlx::query(SELECT_TASK_EXISTS)
            .bind(task_id.as_i64())
            .fetch_optional(&mut *connection)
            .await?;
        Ok(row.is_some())
    }

    /// Inserts a task and returns its generated id.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the insert fails or no key is reported.
    pub async fn insert(
        connection: &mut AnyConnection,
        task: &NewTask,
    ) -> Result<TaskId, StoreError> {
        let result = sqlx::query(INSERT_TASK)
            .bind(task.title.as_str())
            .bind(task.description.as_str())
            .bind(task.color.as_str())
            .execute(&mut *connection)
            .await?;
        generated_key(connection, &result, "task")
            .await
            .map(TaskId::new)
    }

    /// Writes one column of one task.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no row has this id.
    pub async fn update(
        connection: &mut AnyConnection,
        task_id: TaskId,
        update: &TaskUpdate,
    ) -> Result<(), StoreError> {
        let query = sqlx::query(task_update_statement(update));
        let query = match update {
            TaskUpdate::Title(value) | TaskUpdate::Description(value) | TaskUpdate::Color(value) => {
                query.bind(value.as_str())
            }
            TaskUpdate::Archived(flag) => query.bind(flag.as_i64()),
        };
        let result = query
            .bind(task_id.as_i64())
            .execute(&mut *connection)
            .await?;

        // MySQL reports changed rows, so an unchanged value also yields zero.
        if result.rows_affected() == 0 && !Self::exists(connection, task_id).await? {
            return Err(StoreError::NotFound(format!("Task {task_id}")));
        }

        tracing::debug!(%task_id, column = update.column(), "Task updated");
        Ok(())
    }

    /// Deletes one task row. Todos that reference it are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no row has this id.
    pub async fn delete(connection: &mut AnyConnection, task_id: TaskId) -> Result<(), StoreError> {
        let result = sqlx::query(DELETE_TASK)
            .bind(task_id.as_i64())
            .execute(&mut *connection)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("Task {task_id}")));
        }
        Ok(())
    }
}

// =============================================================================
// Todo Store
// =============================================================================

/// Statements over the `todo` table.
pub struct TodoStore;

impl TodoStore {
    /// Lists the todos of one task whose `archived` flag equals `archived`.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the query fails.
    pub async fn list_for_task(
        connection: &mut AnyConnection,
        task_id: TaskId,
        archived: Flag,
    ) -> Result<Vec<Todo>, StoreError> {
        let todos = sqlx::query_as::<_, Todo>(SELECT_TODOS_BY_TASK)
            .bind(task_id.as_i64())
            .bind(archived.as_i64())
            .fetch_all(&mut *connection)
            .await?;
        Ok(todos)
    }

    /// Lists every pinned todo regardless of task or archived state.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the query fails.
    pub async fn list_pinned(connection: &mut AnyConnection) -> Result<Vec<Todo>, StoreError> {
        let todos = sqlx::query_as::<_, Todo>(SELECT_PINNED_TODOS)
            .fetch_all(&mut *connection)
            .await?;
        Ok(todos)
    }

    /// Returns whether a todo row with this id exists.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the query fails.
    pub async fn exists(connection: &mut AnyConnection, todo_id: TodoId) -> Result<bool, StoreError> {
        let row = sqlx::query(SELECT_TODO_EXISTS)
            .bind(todo_id.as_i64())
            .fetch_optional(&mut *connection)
            .await?;
        Ok(row.is_some())
    }

    /// Inserts a todo and returns its generated id.
    ///
    /// The caller is responsible for checking that the parent task exists.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the insert fails or no key is reported.
    pub async fn insert(
        connection: &mut AnyConnection,
        todo: &NewTodo,
    ) -> Result<TodoId, StoreError> {
        let result = sqlx::query(INSERT_TODO)
            .bind(todo.task_id.as_i64())
            .bind(todo.text.as_str())
            .execute(&mut *connection)
            .await?;
        generated_key(connection, &result, "todo")
            .await
            .map(TodoId::new)
    }

    /// Writes one column of one todo.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no row has this id.
    pub async fn update(
        connection: &mut AnyConnection,
        todo_id: TodoId,
        update: &TodoUpdate,
    ) -> Result<(), StoreError> {
        let query = sqlx::query(todo_update_statement(update));
        let query = match update {
            TodoUpdate::Text(value) => query.bind(value.as_str()),
            TodoUpdate::Checked(flag) | TodoUpdate::Archived(flag) | TodoUpdate::Pinned(flag) => {
                query.bind(flag.as_i64())
            }
        };
        let result = query
            .bind(todo_id.as_i64())
            .execute(&mut *connection)
            .await?;

        if result.rows_affected() == 0 && !Self::exists(connection, todo_id).await? {
            return Err(StoreError::NotFound(format!("Todo {todo_id}")));
        }

        tracing::debug!(%todo_id, column = update.column(), "Todo updated");
        Ok(())
    }

    /// Deletes one todo row.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no row has this id.
    pub async fn delete(connection: &mut AnyConnection, todo_id: TodoId) -> Result<(), StoreError> {
        let result = sqlx::query(DELETE_TODO)
            .bind(todo_id.as_i64())
            .execute(&mut *connection)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("Todo {todo_id}")));
        }
        Ok(())
    }
}
