//! Domain module for the task list.
//!
//! This module contains the row models and value objects shared by the
//! store and the HTTP handlers.

pub mod flag;
pub mod task;
pub mod todo;

pub use flag::{Flag, ParseFlagError};
pub use task::{NewTask, Task, TaskId, TaskUpdate, TaskWithTodos};
pub use todo::{NewTodo, Todo, TodoId, TodoUpdate};
