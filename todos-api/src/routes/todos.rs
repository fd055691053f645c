//! Todo endpoints
//!
//! # Endpoints
//!
//! - `GET /api/todos` - List todos matching the query parameters
//! - `GET /api/todos/groups` - Todos grouped by company or category
//! - `GET /api/todos/:id` - Get one todo
//! - `POST /api/todos` - Create a todo
//! - `DELETE /api/todos/:id` - Delete a todo
//!
//! Handlers only unpack the request and hand it to
//! [`TodoService`](todos_shared::service::TodoService); all validation
//! happens there.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use todos_shared::{
    models::todo::{CreateTodo, Todo, TodoGroup},
    query::{GroupQuery, TodoQuery},
};
use uuid::Uuid;

/// Create todo response
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTodoResponse {
    /// Identifier assigned by the store
    pub id: Uuid,
}

/// Delete todo response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTodoResponse {
    /// Whether a todo was deleted
    pub deleted: bool,
}

/// List todos
///
/// # Endpoint
///
/// ```text
/// GET /api/todos?company=acme&status=complete&sortBy=age&sortOrder=desc&limit=10
/// ```
///
/// Filters: `age`, `company`, `owner`, `role`, `category`, `status`,
/// `contains` (or `body`). Ordering: `sortBy`, `sortOrder`. Cap: `limit`.
///
/// # Errors
///
/// - `400 Bad Request`: A filter value failed validation
/// - `500 Internal Server Error`: Store failure
pub async fn list_todos(
    State(state): State<AppState>,
    params: Result<Query<TodoQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Todo>>> {
    let Query(params) = params?;
    let todos = state.service.list(&params).await?;
    Ok(Json(todos))
}

/// Grouped view
///
/// # Endpoint
///
/// ```text
/// GET /api/todos/groups?groupBy=company&sortBy=count&sortOrder=desc
/// ```
///
/// # Response
///
/// ```json
/// [
///   { "_id": "ACME", "count": 2, "todos": [{ "_id": "uuid", "owner": "Fry" }] }
/// ]
/// ```
pub async fn group_todos(
    State(state): State<AppState>,
    params: Result<Query<GroupQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<TodoGroup>>> {
    let Query(params) = params?;
    let groups = state.service.groups(&params).await?;
    Ok(Json(groups))
}

/// Get one todo
///
/// # Errors
///
/// - `400 Bad Request`: `id` is not a legal identifier
/// - `404 Not Found`: No todo has that identifier
pub async fn get_todo(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Todo>> {
    let Path(id) = id?;
    let todo = state.service.get(&id).await?;
    Ok(Json(todo))
}

/// Create a todo
///
/// # Endpoint
///
/// ```text
/// POST /api/todos
/// Content-Type: application/json
///
/// {
///   "name": "Fry",
///   "email": "fry@planetexpress.com",
///   "age": 25,
///   "role": "viewer",
///   "company": "Planet Express",
///   "category": "groceries",
///   "body": "Buy Slurm",
///   "status": false
/// }
/// ```
///
/// # Response
///
/// `201 Created` with `{ "id": "uuid" }`. The avatar is derived from the
/// email; any client-sent avatar is ignored.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed JSON or a field failed validation
pub async fn create_todo(
    State(state): State<AppState>,
    body: Result<Json<CreateTodo>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreateTodoResponse>)> {
    let Json(req) = body?;
    let id = state.service.create(req).await?;
    Ok((StatusCode::CREATED, Json(CreateTodoResponse { id })))
}

/// Delete a todo
///
/// # Errors
///
/// - `400 Bad Request`: `id` is not a legal identifier
/// - `404 Not Found`: Nothing was deleted
pub async fn delete_todo(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<DeleteTodoResponse>> {
    let Path(id) = id?;
    state.service.delete(&id).await?;
    Ok(Json(DeleteTodoResponse { deleted: true }))
}
