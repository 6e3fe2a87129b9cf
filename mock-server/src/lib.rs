//! In-memory todo backend for development and tests.
//!
//! Serves the collection at `/todos` and again under `/api/todos`. The list
//! is kept in creation order and served newest first. Rejections carry a
//! JSON `{"message": ...}` body.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

pub type Db = Arc<RwLock<Vec<Todo>>>;

type Rejection = (StatusCode, Json<ErrorBody>);

fn reject(status: StatusCode, message: &str) -> Rejection {
    (
        status,
        Json(ErrorBody {
            message: message.to_string(),
        }),
    )
}

/// Body extraction failures keep axum's status but use the JSON error shape.
fn malformed(rejection: &JsonRejection) -> Rejection {
    tracing::debug!(error = %rejection.body_text(), "rejected request body");
    reject(rejection.status(), &rejection.body_text())
}

fn not_found() -> Rejection {
    reject(StatusCode::NOT_FOUND, "Todo not found")
}

pub fn app() -> Router {
    app_with(Db::default())
}

/// Router over an existing store, e.g. one seeded by a test.
pub fn app_with(db: Db) -> Router {
    let routes = Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo));
    Router::new()
        .merge(routes.clone())
        .nest("/api", routes)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    let todos = db.read().await;
    Json(todos.iter().rev().cloned().collect())
}

async fn create_todo(
    State(db): State<Db>,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), Rejection> {
    let Json(input) = payload.map_err(|e| malformed(&e))?;
    if input.text.trim().is_empty() {
        return Err(reject(StatusCode::BAD_REQUEST, "Todo text is required"));
    }
    let todo = Todo {
        id: Uuid::new_v4().to_string(),
        text: input.text,
        completed: input.completed,
    };
    tracing::info!(id = %todo.id, "todo created");
    db.write().await.push(todo.clone());
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Todo>, Rejection> {
    let Json(input) = payload.map_err(|e| malformed(&e))?;
    if input.text.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(reject(StatusCode::BAD_REQUEST, "Todo text is required"));
    }
    let mut todos = db.write().await;
    let todo = todos.iter_mut().find(|t| t.id == id).ok_or_else(not_found)?;
    if let Some(text) = input.text {
        todo.text = text;
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    tracing::info!(%id, "todo updated");
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, Rejection> {
    let mut todos = db.write().await;
    let index = todos.iter().position(|t| t.id == id).ok_or_else(not_found)?;
    todos.remove(index);
    tracing::info!(%id, "todo deleted");
    Ok(StatusCode::NO_CONTENT)
}
