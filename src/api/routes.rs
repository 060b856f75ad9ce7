//! Router assembly.
//!
//! Everything under `/api` runs inside [`transaction_layer`]; `/health`
//! sits outside it.

use axum::Router;
use axum::extract::OriginalUri;
use axum::http::{Method, Uri};
use axum::middleware;
use axum::routing::{delete, get, post};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::dto::{
    UpdateTaskArchivedRequest, UpdateTaskColorRequest, UpdateTaskDescriptionRequest,
    UpdateTaskTitleRequest, UpdateTodoArchivedRequest, UpdateTodoCheckedRequest,
    UpdateTodoPinnedRequest, UpdateTodoTextRequest,
};
use super::error::ApiErrorResponse;
use super::handlers::{AppState, health_check};
use super::mutation::{
    create_task, create_todo, delete_task, delete_todo, update_task_field, update_todo_field,
};
use super::query::{
    get_task, get_task_by_archived, list_pinned_todos, list_tasks, list_tasks_by_archived,
};
use super::transaction::transaction_layer;

/// Routes served under `/api`, without state or outer layers.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Reads
        .route("/get/tasks", get(list_tasks).post(list_tasks))
        .route(
            "/get/tasks/{archived}",
            get(list_tasks_by_archived).post(list_tasks_by_archived),
        )
        .route("/get/task/{task_id}", get(get_task).post(get_task))
        .route(
            "/get/task/{task_id}/{archived}",
            get(get_task_by_archived).post(get_task_by_archived),
        )
        .route(
            "/get/todos/pinned",
            get(list_pinned_todos).post(list_pinned_todos),
        )
        // Creates
        .route("/create/task", post(create_task))
        .route("/create/todo", post(create_todo))
        // Task updates
        .route(
            "/update/task/title",
            post(update_task_field::<UpdateTaskTitleRequest>),
        )
        .route(
            "/update/task/description",
            post(update_task_field::<UpdateTaskDescriptionRequest>),
        )
        .route(
            "/update/task/color",
            post(update_task_field::<UpdateTaskColorRequest>),
        )
        .route(
            "/update/task/archived",
            post(update_task_field::<UpdateTaskArchivedRequest>),
        )
        // Todo updates
        .route(
            "/update/todo/text",
            post(update_todo_field::<UpdateTodoTextRequest>),
        )
        .route(
            "/update/todo/checked",
            post(update_todo_field::<UpdateTodoCheckedRequest>),
        )
        .route(
            "/update/todo/archived",
            post(update_todo_field::<UpdateTodoArchivedRequest>),
        )
        .route(
            "/update/todo/pinned",
            post(update_todo_field::<UpdateTodoPinnedRequest>),
        )
        // Deletes
        .route("/delete/task/{task_id}", delete(delete_task))
        .route("/delete/todo/{todo_id}", delete(delete_todo))
}

/// Builds the complete application.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = api_routes()
        .method_not_allowed_fallback(method_not_allowed)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            transaction_layer,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

async fn route_not_found(uri: Uri) -> ApiErrorResponse {
    ApiErrorResponse::not_found(format!("Route {} not found", uri.path()))
}

async fn method_not_allowed(method: Method, OriginalUri(uri): OriginalUri) -> ApiErrorResponse {
    ApiErrorResponse::method_not_allowed(format!(
        "Method {method} not allowed for {}",
        uri.path()
    ))
}
