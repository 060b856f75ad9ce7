//! Infrastructure module for external services.
//!
//! This module contains configuration loading, the database pool and the
//! SQL statements run against it.

pub mod config;
pub mod database;
pub mod store;

pub use config::{ConfigurationError, DatabaseConfig, DatabaseConfigBuilder, Dialect, ServerConfig};
pub use database::Database;
pub use store::{StoreError, TaskStore, TodoStore};
