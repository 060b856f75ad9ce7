//! Integration tests for the todo endpoints.

mod common;

use axum::http::StatusCode;
use rstest::rstest;
use serde_json::{Value, json};

use common::{TestApp, create_test_app};

fn todo_ids(body: &Value) -> Vec<i64> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|todo| todo["todo_id"].as_i64().unwrap())
        .collect()
}

async fn set_flag(app: &TestApp, todo_id: i64, flag: &str, value: Value) {
    let (status, body) = app
        .post(
            &format!("/api/update/todo/{flag}"),
            json!({"todo_id": todo_id, flag: value}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "update {flag} failed: {body}");
}

// =============================================================================
// Create
// =============================================================================

#[rstest]
#[tokio::test]
async fn create_todo_appears_under_its_task_with_flags_unset() {
    let app = create_test_app().await;
    let task_id = app.create_task("Shopping", "", "").await;

    let (status, body) = app
        .post("/api/create/todo", json!({"task_id": task_id, "text": "milk"}))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["response"]["status"], 201);
    let todo_id = body["data"]["todo_id"].as_i64().unwrap();

    let (_, body) = app.get(&format!("/api/get/task/{task_id}")).await;
    assert_eq!(
        body["data"]["todos"],
        json!([{
            "todo_id": todo_id,
            "task_id": task_id,
            "text": "milk",
            "checked": 0,
            "archived": 0,
            "pinned": 0
        }])
    );
}

#[rstest]
#[tokio::test]
async fn create_todo_for_missing_task_is_not_found_and_writes_nothing() {
    let app = create_test_app().await;

    let (status, body) = app
        .post("/api/create/todo", json!({"task_id": 31, "text": "orphan"}))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["response"]["error"], "Task 31 not found");
    assert_eq!(app.count_rows("todo").await, 0);
}

// =============================================================================
// Archived Filter
// =============================================================================

#[rstest]
#[tokio::test]
async fn get_task_filters_todos_by_archived_flag() {
    let app = create_test_app().await;
    let task_id = app.create_task("Chores", "", "").await;
    let active = app.create_todo(task_id, "sweep").await;
    let archived = app.create_todo(task_id, "mop").await;
    set_flag(&app, archived, "archived", json!(1)).await;

    let (_, body) = app.get(&format!("/api/get/task/{task_id}")).await;
    assert_eq!(todo_ids(&body["data"]["todos"]), vec![active]);

    let (_, body) = app.get(&format!("/api/get/task/{task_id}/0")).await;
    assert_eq!(todo_ids(&body["data"]["todos"]), vec![active]);

    let (status, body) = app.get(&format!("/api/get/task/{task_id}/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(todo_ids(&body["data"]["todos"]), vec![archived]);
}

#[rstest]
#[tokio::test]
async fn get_task_only_lists_its_own_todos() {
    let app = create_test_app().await;
    let first = app.create_task("First", "", "").await;
    let second = app.create_task("Second", "", "").await;
    let mine = app.create_todo(first, "mine").await;
    app.create_todo(second, "theirs").await;

    let (_, body) = app.get(&format!("/api/get/task/{first}")).await;

    assert_eq!(todo_ids(&body["data"]["todos"]), vec![mine]);
}

// =============================================================================
// Pinned
// =============================================================================

#[rstest]
#[tokio::test]
async fn list_pinned_returns_pinned_todos_across_tasks() {
    let app = create_test_app().await;
    let first = app.create_task("First", "", "").await;
    let second = app.create_task("Second", "", "").await;
    let pinned_first = app.create_todo(first, "a").await;
    app.create_todo(first, "b").await;
    let pinned_second = app.create_todo(second, "c").await;
    set_flag(&app, pinned_first, "pinned", json!(true)).await;
    set_flag(&app, pinned_second, "pinned", json!(1)).await;
    set_flag(&app, pinned_second, "archived", json!(1)).await;

    let (status, body) = app.get("/api/get/todos/pinned").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(todo_ids(&body["data"]), vec![pinned_first, pinned_second]);
    assert!(
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .all(|todo| todo["pinned"] == 1)
    );
}

#[rstest]
#[tokio::test]
async fn unpinning_removes_todo_from_pinned_list() {
    let app = create_test_app().await;
    let task_id = app.create_task("Task", "", "").await;
    let todo_id = app.create_todo(task_id, "note").await;
    set_flag(&app, todo_id, "pinned", json!(1)).await;
    set_flag(&app, todo_id, "pinned", json!(0)).await;

    let (_, body) = app.post("/api/get/todos/pinned", json!({})).await;

    assert_eq!(body["data"], json!([]));
}

// =============================================================================
// Update / Delete
// =============================================================================

#[rstest]
#[case("checked")]
#[case("archived")]
#[case("pinned")]
#[tokio::test]
async fn update_todo_flag_is_persisted(#[case] flag: &str) {
    let app = create_test_app().await;
    let task_id = app.create_task("Task", "", "").await;
    let todo_id = app.create_todo(task_id, "item").await;

    set_flag(&app, todo_id, flag, json!(1)).await;

    let value: i64 = sqlx::query_scalar(&format!("SELECT {flag} FROM todo WHERE todo_id = ?"))
        .bind(todo_id)
        .fetch_one(app.database.pool())
        .await
        .unwrap();
    assert_eq!(value, 1);
}

#[rstest]
#[tokio::test]
async fn update_todo_text() {
    let app = create_test_app().await;
    let task_id = app.create_task("Task", "", "").await;
    let todo_id = app.create_todo(task_id, "draft").await;

    let (status, body) = app
        .post(
            "/api/update/todo/text",
            json!({"todo_id": todo_id, "text": "final"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"todo_id": todo_id}));

    let (_, body) = app.get(&format!("/api/get/task/{task_id}")).await;
    assert_eq!(body["data"]["todos"][0]["text"], "final");
}

#[rstest]
#[tokio::test]
async fn update_missing_todo_is_not_found() {
    let app = create_test_app().await;

    let (status, body) = app
        .post("/api/update/todo/checked", json!({"todo_id": 8, "checked": 1}))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["response"]["error"], "Todo 8 not found");
}

#[rstest]
#[tokio::test]
async fn delete_todo_removes_only_that_row() {
    let app = create_test_app().await;
    let task_id = app.create_task("Task", "", "").await;
    let kept = app.create_todo(task_id, "keep").await;
    let removed = app.create_todo(task_id, "drop").await;

    let (status, body) = app.delete(&format!("/api/delete/todo/{removed}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"todo_id": removed}));

    let (_, body) = app.get(&format!("/api/get/task/{task_id}")).await;
    assert_eq!(todo_ids(&body["data"]["todos"]), vec![kept]);

    let (status, _) = app.delete(&format!("/api/delete/todo/{removed}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
