//! Task domain model.
//!
//! A task is the top-level work item. It owns any number of todos and can
//! be hidden from the default listing by setting its `archived` flag.

use serde::{Deserialize, Serialize};

use super::flag::Flag;
use super::todo::Todo;

// =============================================================================
// Value Objects - Newtypes
// =============================================================================

/// Database-generated identifier for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for TaskId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

// =============================================================================
// Task Entity
// =============================================================================

/// A row of the `tasks` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    #[sqlx(try_from = "i64")]
    pub task_id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub color: Option<String>,
    #[sqlx(try_from = "i64")]
    pub archived: Flag,
}

/// A task together with the todos that matched the requested archived filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskWithTodos {
    #[serde(flatten)]
    pub task: Task,
    pub todos: Vec<Todo>,
}

/// Column values for inserting a task. The generated key and the
/// `archived` flag come from the database defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub color: String,
}

// =============================================================================
// Single-Column Updates
// =============================================================================

/// One mutable task column together with its new value.
///
/// Each variant corresponds to one update endpoint; the column name is
/// fixed at compile time so no caller input ever reaches the SQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskUpdate {
    Title(String),
    Description(String),
    Color(String),
    Archived(Flag),
}

impl TaskUpdate {
    /// Name of the column this update writes.
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Title(_) => "title",
            Self::Description(_) => "description",
            Self::Color(_) => "color",
            Self::Archived(_) => "archived",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TaskUpdate::Title("a".to_string()), "title")]
    #[case(TaskUpdate::Description("b".to_string()), "description")]
    #[case(TaskUpdate::Color("red".to_string()), "color")]
    #[case(TaskUpdate::Archived(Flag::SET), "archived")]
    fn test_task_update_column(#[case] update: TaskUpdate, #[case] column: &str) {
        assert_eq!(update.column(), column);
    }

    #[rstest]
    fn test_task_with_todos_flattens_task_fields() {
        let detail = TaskWithTodos {
            task: Task {
                task_id: TaskId::new(4),
                title: "Groceries".to_string(),
                description: Some("weekly".to_string()),
                color: Some("green".to_string()),
                archived: Flag::UNSET,
            },
            todos: Vec::new(),
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["task_id"], 4);
        assert_eq!(json["title"], "Groceries");
        assert_eq!(json["archived"], 0);
        assert!(json["todos"].as_array().unwrap().is_empty());
    }
}
