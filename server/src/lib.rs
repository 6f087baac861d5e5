//! HTTP surface of the todo service.
//!
//! Routes translate requests into `TodoManager` calls; `response` turns the
//! results into JSON envelopes and status codes.

pub mod config;
pub mod logging;
pub mod response;

use std::future::Future;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{Method, StatusCode, Uri},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use todo_core::{Todo, TodoId, TodoInput, TodoManager, TodoPatch, TodoStats};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use response::{ApiError, DeletedCount, Envelope};

/// Every route the service answers, with a one-line description.
pub const ENDPOINTS: [(&str, &str); 9] = [
    ("GET /", "API documentation"),
    ("GET /api/todos", "List all todos"),
    ("GET /api/todos/:id", "Fetch one todo"),
    ("POST /api/todos", "Create a todo"),
    ("PUT /api/todos/:id", "Replace a todo"),
    ("PATCH /api/todos/:id", "Partially update a todo"),
    ("DELETE /api/todos/:id", "Delete a todo"),
    ("GET /api/stats", "Completion and priority statistics"),
    ("DELETE /api/todos", "Delete all todos"),
];

pub fn app(manager: TodoManager) -> Router {
    Router::new()
        .route("/", get(doc))
        .route(
            "/api/todos",
            get(list_todos).post(create_todo).delete(delete_all_todos),
        )
        .route(
            "/api/todos/{id}",
            get(get_todo)
                .put(replace_todo)
                .patch(update_todo)
                .delete(delete_todo),
        )
        .route("/api/stats", get(stats))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(manager)
}

/// Serve until `shutdown` resolves.
pub async fn run(
    listener: TcpListener,
    manager: TodoManager,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app(manager))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Insert the two example todos when the collection is empty. Returns how
/// many were inserted.
pub async fn seed_examples(manager: &TodoManager) -> todo_core::Result<usize> {
    if !manager.list().await?.is_empty() {
        return Ok(0);
    }
    let examples = [
        TodoInput::new("Example task").with_priority(1).with_done(false),
        TodoInput::new("Another task").with_priority(2).with_done(true),
    ];
    for input in &examples {
        manager.create(input).await?;
    }
    Ok(examples.len())
}

async fn list_todos(
    State(manager): State<TodoManager>,
) -> Result<Json<Envelope<Vec<Todo>>>, ApiError> {
    let todos = manager.list().await?;
    let count = todos.len();
    Ok(Json(Envelope::new(todos).with_count(count)))
}

async fn get_todo(
    State(manager): State<TodoManager>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    let id: TodoId = id.parse()?;
    Ok(Json(Envelope::new(manager.get(id).await?)))
}

async fn create_todo(
    State(manager): State<TodoManager>,
    payload: Result<Json<TodoInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Todo>>), ApiError> {
    let Json(input) = payload?;
    let todo = manager.create(&input).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(todo).with_message("Todo created")),
    ))
}

async fn replace_todo(
    State(manager): State<TodoManager>,
    Path(id): Path<String>,
    payload: Result<Json<TodoInput>, JsonRejection>,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    let id: TodoId = id.parse()?;
    let Json(input) = payload?;
    let todo = manager.replace(id, &input).await?;
    Ok(Json(Envelope::new(todo).with_message("Todo replaced")))
}

async fn update_todo(
    State(manager): State<TodoManager>,
    Path(id): Path<String>,
    payload: Result<Json<TodoPatch>, JsonRejection>,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    let id: TodoId = id.parse()?;
    let Json(patch) = payload?;
    let todo = manager.update(id, &patch).await?;
    Ok(Json(Envelope::new(todo).with_message("Todo updated")))
}

async fn delete_todo(
    State(manager): State<TodoManager>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: TodoId = id.parse()?;
    manager.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_all_todos(
    State(manager): State<TodoManager>,
) -> Result<Json<Envelope<DeletedCount>>, ApiError> {
    let deleted_count = manager.delete_all().await?;
    Ok(Json(
        Envelope::new(DeletedCount { deleted_count })
            .with_message(format!("{deleted_count} todo(s) deleted")),
    ))
}

async fn stats(
    State(manager): State<TodoManager>,
) -> Result<Json<Envelope<TodoStats>>, ApiError> {
    Ok(Json(Envelope::new(manager.stats().await?)))
}

async fn doc() -> Json<Value> {
    Json(doc_body())
}

fn doc_body() -> Value {
    let endpoints: serde_json::Map<String, Value> = ENDPOINTS
        .iter()
        .map(|(route, description)| (route.to_string(), Value::from(*description)))
        .collect();
    json!({
        "message": "Todo REST API - documentation",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": endpoints,
        "exampleTodo": {"id": 1, "name": "My task", "priority": 1, "done": false},
    })
}

async fn not_found(method: Method, uri: Uri) -> (StatusCode, Json<Value>) {
    let requested_path = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string());
    let available: Vec<&str> = ENDPOINTS.iter().map(|(route, _)| *route).collect();
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "Endpoint not found",
            "requestedPath": requested_path,
            "method": method.as_str(),
            "availableEndpoints": available,
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_lists_every_endpoint() {
        let body = doc_body();
        let endpoints = body["endpoints"].as_object().unwrap();
        assert_eq!(endpoints.len(), ENDPOINTS.len());
        assert_eq!(endpoints["GET /api/stats"], "Completion and priority statistics");
        assert_eq!(body["exampleTodo"]["priority"], 1);
    }

    #[tokio::test]
    async fn seed_fills_only_an_empty_collection() {
        let manager = TodoManager::in_memory();
        assert_eq!(seed_examples(&manager).await.unwrap(), 2);
        assert_eq!(seed_examples(&manager).await.unwrap(), 0);

        let todos = manager.list().await.unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].name(), "Example task");
        assert!(todos[1].done());
    }
}
