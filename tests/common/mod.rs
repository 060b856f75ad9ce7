//! Common test helpers for integration tests.
//!
//! Each test gets its own in-memory `SQLite` database behind a single-connection
//! pool, so the schema and every row live exactly as long as the test.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::{TestApp, create_test_app};
//! ```
//!
//! # Note
//!
//! The `#![allow(dead_code)]` attribute is necessary because Rust compiles each
//! integration test file as a separate crate. Helpers used only by some test
//! files would otherwise generate dead code warnings in the others.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use tasklist_api::api::{AppState, router};
use tasklist_api::infrastructure::{Database, DatabaseConfig};

// =============================================================================
// Application Helpers
// =============================================================================

/// A router together with the database it is wired to.
pub struct TestApp {
    pub router: Router,
    pub database: Database,
}

/// Opens a fresh in-memory database with the schema in place.
pub async fn create_test_database() -> Database {
    let config = DatabaseConfig::builder()
        .url("sqlite::memory:")
        .max_connections(1)
        .min_connections(1)
        .create_schema(true)
        .build()
        .expect("Failed to build test database config");

    Database::connect(&config)
        .await
        .expect("Failed to open test database")
}

/// Builds the full application over a fresh database.
pub async fn create_test_app() -> TestApp {
    let database = create_test_database().await;
    let router = router(AppState::new(database.clone()));
    TestApp { router, database }
}

// =============================================================================
// Request Helpers
// =============================================================================

impl TestApp {
    /// Sends one request and returns the status and the decoded JSON body.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        send(&self.router, method, uri, body).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    /// Creates a task and returns its id.
    pub async fn create_task(&self, title: &str, description: &str, color: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/create/task",
                json!({"title": title, "description": description, "color": color}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create task failed: {body}");
        body["data"]["task_id"].as_i64().expect("task_id missing")
    }

    /// Creates a todo under `task_id` and returns its id.
    pub async fn create_todo(&self, task_id: i64, text: &str) -> i64 {
        let (status, body) = self
            .post("/api/create/todo", json!({"task_id": task_id, "text": text}))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create todo failed: {body}");
        body["data"]["todo_id"].as_i64().expect("todo_id missing")
    }

    /// Counts rows in `table` directly through the pool.
    pub async fn count_rows(&self, table: &str) -> i64 {
        let statement = format!("SELECT COUNT(*) FROM {table}");
        sqlx::query_scalar::<_, i64>(&statement)
            .fetch_one(self.database.pool())
            .await
            .expect("Failed to count rows")
    }
}

/// Sends one request through `router` and decodes the JSON body.
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    send_request(router, request).await
}

/// Sends a prebuilt request, for bodies that are not valid JSON.
pub async fn send_request(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Router is infallible");

    let status = response.status();
    let body_bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect body")
        .to_bytes();
    let body = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, body)
}
