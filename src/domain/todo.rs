//! Todo domain model.
//!
//! A todo is a checklist entry that belongs to exactly one task.

use serde::{Deserialize, Serialize};

use super::flag::Flag;
use super::task::TaskId;

/// Database-generated identifier for a todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(i64);

impl TodoId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for TodoId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A row of the `todo` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    #[sqlx(try_from = "i64")]
    pub todo_id: TodoId,
    #[sqlx(try_from = "i64")]
    pub task_id: TaskId,
    pub text: String,
    #[sqlx(try_from = "i64")]
    pub checked: Flag,
    #[sqlx(try_from = "i64")]
    pub archived: Flag,
    #[sqlx(try_from = "i64")]
    pub pinned: Flag,
}

/// Column values for inserting a todo; every flag starts unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub task_id: TaskId,
    pub text: String,
}

/// One mutable todo column together with its new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoUpdate {
    Text(String),
    Checked(Flag),
    Archived(Flag),
    Pinned(Flag),
}

impl TodoUpdate {
    /// Name of the column this update writes.
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Checked(_) => "checked",
            Self::Archived(_) => "archived",
            Self::Pinned(_) => "pinned",
        }
    }
}
