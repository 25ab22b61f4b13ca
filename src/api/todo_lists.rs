//! Todo list endpoints.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | /api/todolists | [`list_todo_lists`] |
//! | POST | /api/todolists | [`create_todo_list`] |
//! | GET | /api/todolists/{id} | [`get_todo_list`] |
//! | PUT | /api/todolists/{id} | [`update_todo_list`] |
//! | DELETE | /api/todolists/{id} | [`delete_todo_list`] |
//! | POST | /api/todolists/{id}/toggle_complete | [`toggle_complete`] |

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::dto::{
    CreateTodoListRequest, TodoListResponse, ToggleCompleteAcceptedResponse,
    ToggleCompleteRequest, UpdateTodoListRequest, validate_name,
};
use super::error::ApiErrorResponse;
use super::handlers::AppState;
use crate::domain::TodoListId;

/// GET /api/todolists
#[allow(clippy::unused_async)]
pub async fn list_todo_lists(State(state): State<AppState>) -> Json<Vec<TodoListResponse>> {
    Json(
        state
            .store
            .all()
            .iter()
            .map(TodoListResponse::from)
            .collect(),
    )
}

/// POST /api/todolists
///
/// # Errors
///
/// - `400 Bad Request` if the name is blank.
#[allow(clippy::unused_async)]
pub async fn create_todo_list(
    State(state): State<AppState>,
    Json(request): Json<CreateTodoListRequest>,
) -> Result<(StatusCode, Json<TodoListResponse>), ApiErrorResponse> {
    let name = validate_name(&request.name)?;
    let list = state.store.create(name);
    tracing::debug!(list_id = %list.id, "Todo list created");
    Ok((StatusCode::CREATED, Json(list.into())))
}

/// GET /api/todolists/{id}
///
/// # Errors
///
/// - `404 Not Found` if the list does not exist.
#[allow(clippy::unused_async)]
pub async fn get_todo_list(
    State(state): State<AppState>,
    Path(list_id): Path<u64>,
) -> Result<Json<TodoListResponse>, ApiErrorResponse> {
    let list = state.store.get(TodoListId::new(list_id))?;
    Ok(Json(list.into()))
}

/// PUT /api/todolists/{id}
///
/// Renames the list. Its todos are kept.
///
/// # Errors
///
/// - `400 Bad Request` if the name is blank.
/// - `404 Not Found` if the list does not exist.
#[allow(clippy::unused_async)]
pub async fn update_todo_list(
    State(state): State<AppState>,
    Path(list_id): Path<u64>,
    Json(request): Json<UpdateTodoListRequest>,
) -> Result<Json<TodoListResponse>, ApiErrorResponse> {
    let name = validate_name(&request.name)?;
    let list = state.store.rename(TodoListId::new(list_id), name)?;
    Ok(Json(list.into()))
}

/// DELETE /api/todolists/{id}
///
/// # Errors
///
/// - `404 Not Found` if the list does not exist.
#[allow(clippy::unused_async)]
pub async fn delete_todo_list(
    State(state): State<AppState>,
    Path(list_id): Path<u64>,
) -> Result<StatusCode, ApiErrorResponse> {
    state.store.delete(TodoListId::new(list_id))?;
    tracing::debug!(list_id, "Todo list deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/todolists/{id}/toggle_complete
///
/// Schedules a background toggle and answers `202 Accepted` right away.
/// The result arrives on the list's WebSocket as `toggle_complete_done` or
/// `toggle_complete_error`.
///
/// # Errors
///
/// - `409 Conflict` if a toggle of this list is still running.
#[allow(clippy::unused_async)]
pub async fn toggle_complete(
    State(state): State<AppState>,
    Path(list_id): Path<u64>,
    Json(request): Json<ToggleCompleteRequest>,
) -> Result<(StatusCode, Json<ToggleCompleteAcceptedResponse>), ApiErrorResponse> {
    let accepted = state
        .toggles
        .accept_toggle(TodoListId::new(list_id), request.completed)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ToggleCompleteAcceptedResponse::accepted(
            accepted.list_id.value(),
        )),
    ))
}
