//! Route configuration.
//!
//! # Routes
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | / | `root` |
//! | GET | /health | `health_check` |
//! | GET, POST | /api/todolists | `list_todo_lists`, `create_todo_list` |
//! | GET, PUT, DELETE | /api/todolists/{id} | `get_todo_list`, `update_todo_list`, `delete_todo_list` |
//! | POST | /api/todolists/{id}/toggle_complete | `toggle_complete` |
//! | GET, POST | /api/todolists/{list_id}/todos | `list_todos`, `create_todo` |
//! | GET, PUT, DELETE | /api/todolists/{list_id}/todos/{todo_id} | `get_todo`, `update_todo`, `delete_todo` |
//! | GET | /ws/todolists/{id} | `todo_list_socket` |

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use super::handlers::{AppState, health_check, root};
use super::todo_lists::{
    create_todo_list, delete_todo_list, get_todo_list, list_todo_lists, toggle_complete,
    update_todo_list,
};
use super::todos::{create_todo, delete_todo, get_todo, list_todos, update_todo};
use super::websocket::todo_list_socket;
use crate::infrastructure::AppConfig;

/// Creates the router with every route and the CORS policy from `state`'s
/// configuration.
///
/// # Example
///
/// ```rust,ignore
/// let state = AppState::in_memory(AppConfig::default(), Handle::current());
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
/// axum::serve(listener, create_router(state)).await?;
/// ```
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        // Todo lists
        .route(
            "/api/todolists",
            get(list_todo_lists).post(create_todo_list),
        )
        .route(
            "/api/todolists/{id}",
            get(get_todo_list)
                .put(update_todo_list)
                .delete(delete_todo_list),
        )
        .route("/api/todolists/{id}/toggle_complete", post(toggle_complete))
        // Todos
        .route(
            "/api/todolists/{list_id}/todos",
            get(list_todos).post(create_todo),
        )
        .route(
            "/api/todolists/{list_id}/todos/{todo_id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        // Notifications
        .route("/ws/todolists/{id}", get(todo_list_socket))
        .layer(cors)
        .with_state(state)
}

/// Credentialed CORS restricted to the configured origins.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(error) => {
                tracing::warn!(%origin, %error, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
