//! API module for HTTP and WebSocket handlers.
//!
//! This module contains route definitions and request/response handlers.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod todo_lists;
pub mod todos;
pub mod websocket;

pub use dto::{
    CreateTodoListRequest, CreateTodoRequest, TodoListResponse, TodoResponse,
    ToggleCompleteAcceptedResponse, ToggleCompleteRequest, UpdateTodoListRequest,
    UpdateTodoRequest,
};
pub use error::{ApiError, ApiErrorResponse, FieldError, ValidationError};
pub use handlers::{AppState, HealthResponse, health_check, root};
pub use routes::create_router;
pub use todo_lists::{
    create_todo_list, delete_todo_list, get_todo_list, list_todo_lists, toggle_complete,
    update_todo_list,
};
pub use todos::{create_todo, delete_todo, get_todo, list_todos, update_todo};
pub use websocket::{serve_connection, todo_list_socket};
