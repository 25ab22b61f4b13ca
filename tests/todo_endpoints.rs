//! Integration tests driving the full router.
//!
//! Requests go through [`create_router`] with `tower::ServiceExt::oneshot`,
//! so routing, extraction, CORS and error mapping are exercised together.

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{create_list_with_id, create_test_app_state};
use todo_list_api::api::{AppState, create_router};
use todo_list_api::domain::TodoListId;

// =============================================================================
// Helpers
// =============================================================================

async fn send(router: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn router(state: &AppState) -> Router {
    create_router(state.clone())
}

// =============================================================================
// Service Endpoints
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_root_and_health() {
    let state = create_test_app_state();

    let (status, body) = send(router(&state), Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "TodoList API is running"}));

    let (status, body) = send(router(&state), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

// =============================================================================
// Todo Lists
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_todo_list_lifecycle() {
    let state = create_test_app_state();

    let (status, created) = send(
        router(&state),
        Method::POST,
        "/api/todolists",
        Some(json!({"name": "Groceries"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created, json!({"id": 1, "name": "Groceries", "todos": []}));

    let (status, renamed) = send(
        router(&state),
        Method::PUT,
        "/api/todolists/1",
        Some(json!({"name": "Shopping"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "Shopping");

    let (status, all) = send(router(&state), Method::GET, "/api/todolists", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (status, _) = send(router(&state), Method::DELETE, "/api/todolists/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(router(&state), Method::GET, "/api/todolists/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[rstest]
#[case(Method::POST, "/api/todolists")]
#[case(Method::PUT, "/api/todolists/1")]
#[tokio::test]
async fn test_blank_list_name_is_rejected(#[case] method: Method, #[case] uri: &str) {
    let state = create_test_app_state();
    create_list_with_id(state.store.as_ref(), 1, 0);

    let (status, body) = send(router(&state), method, uri, Some(json!({"name": "   "}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["details"][0]["field"], "name");
}

// =============================================================================
// Todos
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_todo_lifecycle() {
    let state = create_test_app_state();
    create_list_with_id(state.store.as_ref(), 1, 0);

    let (status, first) = send(
        router(&state),
        Method::POST,
        "/api/todolists/1/todos",
        Some(json!({"description": "milk"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first, json!({"id": 1, "description": "milk", "completed": false}));

    let (status, second) = send(
        router(&state),
        Method::POST,
        "/api/todolists/1/todos",
        Some(json!({"description": "eggs", "completed": true})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["id"], 2);

    let (status, updated) = send(
        router(&state),
        Method::PUT,
        "/api/todolists/1/todos/1",
        Some(json!({"completed": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated, json!({"id": 1, "description": "milk", "completed": true}));

    let (status, _) = send(router(&state), Method::DELETE, "/api/todolists/1/todos/2", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, todos) = send(router(&state), Method::GET, "/api/todolists/1/todos", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(todos, json!([{"id": 1, "description": "milk", "completed": true}]));
}

#[rstest]
#[case(Method::GET, "/api/todolists/3/todos", None)]
#[case(Method::GET, "/api/todolists/1/todos/9", None)]
#[case(Method::PUT, "/api/todolists/1/todos/9", Some(json!({"completed": true})))]
#[case(Method::DELETE, "/api/todolists/1/todos/9", None)]
#[case(Method::POST, "/api/todolists/3/todos", Some(json!({"description": "x"})))]
#[tokio::test]
async fn test_missing_todo_or_list_is_not_found(
    #[case] method: Method,
    #[case] uri: &str,
    #[case] body: Option<Value>,
) {
    let state = create_test_app_state();
    create_list_with_id(state.store.as_ref(), 1, 0);

    let (status, _) = send(router(&state), method, uri, body).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[case(Method::POST, "/api/todolists/1/todos", json!({"completed": true}))]
#[case(Method::POST, "/api/todolists/1/todos", json!({"description": ""}))]
#[case(Method::PUT, "/api/todolists/1/todos/1", json!({}))]
#[case(Method::PUT, "/api/todolists/1/todos/1", json!({"description": "  "}))]
#[tokio::test]
async fn test_invalid_todo_body_is_bad_request(
    #[case] method: Method,
    #[case] uri: &str,
    #[case] body: Value,
) {
    let state = create_test_app_state();
    create_list_with_id(state.store.as_ref(), 1, 1);

    let (status, response) = send(router(&state), method, uri, Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Toggle
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_toggle_complete_accepted_then_applied() {
    let state = create_test_app_state();
    create_list_with_id(state.store.as_ref(), 1, 3);
    let (_subscriber, mut outbox) = common::subscribe(&state, TodoListId::new(1));

    let (status, body) = send(
        router(&state),
        Method::POST,
        "/api/todolists/1/toggle_complete",
        Some(json!({"completed": true})),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body, json!({"status": "accepted", "todo_list_id": 1}));

    let event = outbox.recv().await.unwrap();
    assert_eq!(
        serde_json::to_value(event).unwrap(),
        json!({"event": "toggle_complete_done", "listId": 1, "completed": true})
    );
    let list = state.store.get(TodoListId::new(1)).unwrap();
    assert!(list.todos.iter().all(|todo| todo.completed));
}

#[rstest]
#[tokio::test]
async fn test_toggle_complete_conflict_while_in_flight() {
    let state = create_test_app_state();
    create_list_with_id(state.store.as_ref(), 1, 1);
    state.locks.lock(TodoListId::new(1));

    let (status, body) = send(
        router(&state),
        Method::POST,
        "/api/todolists/1/toggle_complete",
        Some(json!({"completed": true})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "TOGGLE_IN_PROGRESS");
}

// =============================================================================
// WebSocket and CORS
// =============================================================================

#[rstest]
#[case(None)]
#[case(Some("http://evil.example"))]
#[tokio::test]
async fn test_websocket_rejects_disallowed_origin(#[case] origin: Option<&str>) {
    let state = create_test_app_state();
    let mut builder = Request::builder()
        .method(Method::GET)
        .uri("/ws/todolists/1")
        .header(header::CONNECTION, "upgrade")
        .header(header::UPGRADE, "websocket")
        .header(header::SEC_WEBSOCKET_VERSION, "13")
        .header(header::SEC_WEBSOCKET_KEY, "dGhlIHNhbXBsZSBub25jZQ==");
    if let Some(origin) = origin {
        builder = builder.header(header::ORIGIN, origin);
    }

    let response = router(&state)
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(!state.notifier.is_registered(TodoListId::new(1)));
}

#[rstest]
#[tokio::test]
async fn test_websocket_allowed_origin_passes_origin_check() {
    let state = create_test_app_state();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/ws/todolists/1")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();

    let response = router(&state).oneshot(request).await.unwrap();

    assert_ne!(response.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[tokio::test]
async fn test_cors_allows_configured_origin_with_credentials() {
    let state = create_test_app_state();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/todolists")
        .header(header::ORIGIN, "http://127.0.0.1:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = router(&state).oneshot(request).await.unwrap();
    let headers = response.headers();

    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://127.0.0.1:5173"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}
