//! Data Transfer Objects for API requests and responses.
//!
//! Request bodies are flat JSON objects. Unknown keys are rejected so a
//! misspelled field surfaces as 400 rather than as a silent no-op.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::{Flag, NewTask, NewTodo, TaskId, TaskUpdate, TodoId, TodoUpdate};

// =============================================================================
// Create Requests
// =============================================================================

/// Body of `POST /api/create/task`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(request: CreateTaskRequest) -> Self {
        Self {
            title: request.title,
            description: request.description,
            color: request.color,
        }
    }
}

/// Body of `POST /api/create/todo`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTodoRequest {
    pub task_id: TaskId,
    pub text: String,
}

impl From<CreateTodoRequest> for NewTodo {
    fn from(request: CreateTodoRequest) -> Self {
        Self {
            task_id: request.task_id,
            text: request.text,
        }
    }
}

// =============================================================================
// Update Requests
// =============================================================================

/// A request body that names one task and one new column value.
pub trait TaskFieldUpdate: DeserializeOwned + Send + 'static {
    fn into_parts(self) -> (TaskId, TaskUpdate);
}

/// A request body that names one todo and one new column value.
pub trait TodoFieldUpdate: DeserializeOwned + Send + 'static {
    fn into_parts(self) -> (TodoId, TodoUpdate);
}

/// Declares a `{<id>, <field>}` request body and its conversion.
macro_rules! field_update {
    ($name:ident: $field_trait:ident, $id_field:ident: $id:ty, $field:ident: $value:ty => $update:ident::$variant:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
        #[serde(deny_unknown_fields)]
        pub struct $name {
            pub $id_field: $id,
            pub $field: $value,
        }

        impl $field_trait for $name {
            fn into_parts(self) -> ($id, $update) {
                (self.$id_field, $update::$variant(self.$field))
            }
        }
    };
}

field_update!(UpdateTaskTitleRequest: TaskFieldUpdate, task_id: TaskId, title: String => TaskUpdate::Title);
field_update!(UpdateTaskDescriptionRequest: TaskFieldUpdate, task_id: TaskId, description: String => TaskUpdate::Description);
field_update!(UpdateTaskColorRequest: TaskFieldUpdate, task_id: TaskId, color: String => TaskUpdate::Color);
field_update!(UpdateTaskArchivedRequest: TaskFieldUpdate, task_id: TaskId, archived: Flag => TaskUpdate::Archived);

field_update!(UpdateTodoTextRequest: TodoFieldUpdate, todo_id: TodoId, text: String => TodoUpdate::Text);
field_update!(UpdateTodoCheckedRequest: TodoFieldUpdate, todo_id: TodoId, checked: Flag => TodoUpdate::Checked);
field_update!(UpdateTodoArchivedRequest: TodoFieldUpdate, todo_id: TodoId, archived: Flag => TodoUpdate::Archived);
field_update!(UpdateTodoPinnedRequest: TodoFieldUpdate, todo_id: TodoId, pinned: Flag => TodoUpdate::Pinned);

// =============================================================================
// Responses
// =============================================================================

/// `{"task_id": …}` returned by task mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskKey {
    pub task_id: TaskId,
}

/// `{"todo_id": …}` returned by todo mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoKey {
    pub todo_id: TodoId,
}
