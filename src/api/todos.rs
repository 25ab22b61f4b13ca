//! Todo endpoints nested under a list.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | /api/todolists/{list_id}/todos | [`list_todos`] |
//! | POST | /api/todolists/{list_id}/todos | [`create_todo`] |
//! | GET | /api/todolists/{list_id}/todos/{todo_id} | [`get_todo`] |
//! | PUT | /api/todolists/{list_id}/todos/{todo_id} | [`update_todo`] |
//! | DELETE | /api/todolists/{list_id}/todos/{todo_id} | [`delete_todo`] |

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::dto::{
    CreateTodoRequest, TodoResponse, UpdateTodoRequest, validate_create_todo,
    validate_update_todo,
};
use super::error::ApiErrorResponse;
use super::handlers::AppState;
use crate::domain::{TodoId, TodoListId};
use crate::infrastructure::StoreError;

/// GET /api/todolists/{list_id}/todos
///
/// # Errors
///
/// - `404 Not Found` if the list does not exist.
#[allow(clippy::unused_async)]
pub async fn list_todos(
    State(state): State<AppState>,
    Path(list_id): Path<u64>,
) -> Result<Json<Vec<TodoResponse>>, ApiErrorResponse> {
    let list = state.store.get(TodoListId::new(list_id))?;
    Ok(Json(list.todos.iter().map(TodoResponse::from).collect()))
}

/// POST /api/todolists/{list_id}/todos
///
/// # Errors
///
/// - `400 Bad Request` if the description is missing or blank.
/// - `404 Not Found` if the list does not exist.
#[allow(clippy::unused_async)]
pub async fn create_todo(
    State(state): State<AppState>,
    Path(list_id): Path<u64>,
    Json(request): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoResponse>), ApiErrorResponse> {
    let validated = validate_create_todo(&request)?;
    let todo = state.store.add_todo(
        TodoListId::new(list_id),
        validated.description,
        validated.completed,
    )?;
    Ok((StatusCode::CREATED, Json(todo.into())))
}

/// GET /api/todolists/{list_id}/todos/{todo_id}
///
/// # Errors
///
/// - `404 Not Found` if the list or the todo does not exist.
#[allow(clippy::unused_async)]
pub async fn get_todo(
    State(state): State<AppState>,
    Path((list_id, todo_id)): Path<(u64, u64)>,
) -> Result<Json<TodoResponse>, ApiErrorResponse> {
    let list_id = TodoListId::new(list_id);
    let todo_id = TodoId::new(todo_id);
    let list = state.store.get(list_id)?;
    let todo = list
        .todo(todo_id)
        .ok_or(StoreError::TodoNotFound { list_id, todo_id })?;
    Ok(Json(todo.into()))
}

/// PUT /api/todolists/{list_id}/todos/{todo_id}
///
/// Applies the fields present in the body.
///
/// # Errors
///
/// - `400 Bad Request` if no field is present or the description is blank.
/// - `404 Not Found` if the list or the todo does not exist.
#[allow(clippy::unused_async)]
pub async fn update_todo(
    State(state): State<AppState>,
    Path((list_id, todo_id)): Path<(u64, u64)>,
    Json(request): Json<UpdateTodoRequest>,
) -> Result<Json<TodoResponse>, ApiErrorResponse> {
    let patch = validate_update_todo(&request)?;
    let todo = state
        .store
        .update_todo(TodoListId::new(list_id), TodoId::new(todo_id), patch)?;
    Ok(Json(todo.into()))
}

/// DELETE /api/todolists/{list_id}/todos/{todo_id}
///
/// # Errors
///
/// - `404 Not Found` if the list or the todo does not exist.
#[allow(clippy::unused_async)]
pub async fn delete_todo(
    State(state): State<AppState>,
    Path((list_id, todo_id)): Path<(u64, u64)>,
) -> Result<StatusCode, ApiErrorResponse> {
    state
        .store
        .delete_todo(TodoListId::new(list_id), TodoId::new(todo_id))?;
    Ok(StatusCode::NO_CONTENT)
}
