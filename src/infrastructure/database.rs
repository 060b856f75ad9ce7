//! Connection pool and transaction entry point.
//!
//! The pool is an `sqlx::AnyPool`, so the same parameterized statements run
//! against `MySQL` in production and `SQLite` in local runs and tests. Both
//! backends use `?` placeholders.
//!
//! # Table Schema (`MySQL`)
//!
//! ```sql
//! CREATE TABLE tasks (
//!     task_id     INT AUTO_INCREMENT PRIMARY KEY,
//!     title       TEXT NOT NULL,
//!     description TEXT,
//!     color       VARCHAR(64),
//!     archived    TINYINT NOT NULL DEFAULT 0
//! );
//!
//! CREATE TABLE todo (
//!     todo_id  INT AUTO_INCREMENT PRIMARY KEY,
//!     task_id  INT NOT NULL,
//!     text     TEXT NOT NULL,
//!     checked  TINYINT NOT NULL DEFAULT 0,
//!     archived TINYINT NOT NULL DEFAULT 0,
//!     pinned   TINYINT NOT NULL DEFAULT 0,
//!     INDEX idx_todo_task_id (task_id)
//! );
//! ```
//!
//! `todo.task_id` is indexed but carries no database-level constraint:
//! deleting a task leaves its todos in place, and the create-todo path
//! checks that the parent exists.

use sqlx::any::{AnyPoolOptions, install_default_drivers};
use sqlx::{Any, AnyPool, Transaction};

use super::config::{DatabaseConfig, Dialect};
use super::store::StoreError;

const MYSQL_SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS tasks (\
        task_id INT AUTO_INCREMENT PRIMARY KEY, \
        title TEXT NOT NULL, \
        description TEXT, \
        color VARCHAR(64), \
        archived TINYINT NOT NULL DEFAULT 0\
    )",
    "CREATE TABLE IF NOT EXISTS todo (\
        todo_id INT AUTO_INCREMENT PRIMARY KEY, \
        task_id INT NOT NULL, \
        text TEXT NOT NULL, \
        checked TINYINT NOT NULL DEFAULT 0, \
        archived TINYINT NOT NULL DEFAULT 0, \
        pinned TINYINT NOT NULL DEFAULT 0, \
        INDEX idx_todo_task_id (task_id)\
    )",
];

const SQLITE_SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS tasks (\
        task_id INTEGER PRIMARY KEY AUTOINCREMENT, \
        title TEXT NOT NULL, \
        description TEXT, \
        color TEXT, \
        archived INTEGER NOT NULL DEFAULT 0\
    )",
    "CREATE TABLE IF NOT EXISTS todo (\
        todo_id INTEGER PRIMARY KEY AUTOINCREMENT, \
        task_id INTEGER NOT NULL, \
        text TEXT NOT NULL, \
        checked INTEGER NOT NULL DEFAULT 0, \
        archived INTEGER NOT NULL DEFAULT 0, \
        pinned INTEGER NOT NULL DEFAULT 0\
    )",
    "CREATE INDEX IF NOT EXISTS idx_todo_task_id ON todo (task_id)",
];

/// Shared handle to the connection pool.
///
/// Cloning is cheap; every clone refers to the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: AnyPool,
    dialect: Dialect,
}

impl Database {
    /// Opens the pool described by `config`, creating the schema first when
    /// `config.create_schema` is set.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Connection` if the pool cannot be opened, or any
    /// error raised while creating the schema.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        install_default_drivers();

        let mut options = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime);

        // An in-memory SQLite database lives and dies with its connection.
        if config.url.contains(":memory:") {
            options = options.idle_timeout(None).max_lifetime(None);
        }

        let pool = options.connect(&config.url).await?;

        tracing::info!(
            url = %config.redacted_url(),
            dialect = ?config.dialect,
            max_connections = config.max_connections,
            "Database pool opened"
        );

        let database = Self {
            pool,
            dialect: config.dialect,
        };

        if config.create_schema {
            database.ensure_schema().await?;
        }

        Ok(database)
    }

    /// Begins a transaction on a freshly acquired pooled connection.
    ///
    /// Dropping the returned transaction without committing rolls it back
    /// and returns the connection to the pool.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Connection` if no connection can be acquired.
    pub async fn begin(&self) -> Result<Transaction<'static, Any>, StoreError> {
        Ok(self.pool.begin().await?)
    }

    /// Creates the `tasks` and `todo` tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if any DDL statement fails.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let statements = match self.dialect {
            Dialect::MySql => MYSQL_SCHEMA,
            Dialect::Sqlite => SQLITE_SCHEMA,
        };

        for statement in statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        tracing::info!(dialect = ?self.dialect, "Database schema ensured");
        Ok(())
    }

    #[must_use]
    pub const fn pool(&self) -> &AnyPool {
        &self.pool
    }

    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Closes every pooled connection. Pending `begin` calls fail afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn memory_config(create_schema: bool) -> DatabaseConfig {
        DatabaseConfig::builder()
            .url("sqlite::memory:")
            .max_connections(1)
            .min_connections(1)
            .create_schema(create_schema)
            .build()
            .unwrap()
    }

    async fn table_names(database: &Database) -> Vec<String> {
        sqlx::query_scalar::<_, String>(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('tasks', 'todo') \
             ORDER BY name",
        )
        .fetch_all(database.pool())
        .await
        .unwrap()
    }

    #[rstest]
    #[tokio::test]
    async fn test_connect_creates_schema_when_asked() {
        let database = Database::connect(&memory_config(true)).await.unwrap();

        assert_eq!(database.dialect(), Dialect::Sqlite);
        assert_eq!(table_names(&database).await, vec!["tasks", "todo"]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_connect_without_schema_leaves_database_empty() {
        let database = Database::connect(&memory_config(false)).await.unwrap();

        assert!(table_names(&database).await.is_empty());

        database.ensure_schema().await.unwrap();
        database.ensure_schema().await.unwrap();
        assert_eq!(table_names(&database).await.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn test_dropped_transaction_rolls_back() {
        let database = Database::connect(&memory_config(true)).await.unwrap();

        {
            let mut transaction = database.begin().await.unwrap();
            sqlx::query("INSERT INTO tasks (title) VALUES ('temp')")
                .execute(&mut *transaction)
                .await
                .unwrap();
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
            .fetch_one(database.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn test_begin_after_close_is_connection_error() {
        let database = Database::connect(&memory_config(true)).await.unwrap();
        database.close().await;

        let error = database.begin().await.unwrap_err();
        assert!(matches!(error, StoreError::Connection(_)));
    }
}
