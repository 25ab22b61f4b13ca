//! Shared application state and service-level endpoints.

use std::sync::Arc;

use axum::Json;
use serde::Serialize;
use tokio::runtime::Handle;

use crate::application::ToggleCompleteService;
use crate::infrastructure::{
    AppConfig, InMemoryTodoListStore, NotificationChannel, TodoListStore, ToggleLockRegistry,
};

// =============================================================================
// Application State
// =============================================================================

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Todo list storage.
    pub store: Arc<dyn TodoListStore>,
    /// Lists with a toggle in flight.
    pub locks: Arc<ToggleLockRegistry>,
    /// WebSocket subscribers per list.
    pub notifier: Arc<NotificationChannel>,
    /// Background toggle scheduler.
    pub toggles: ToggleCompleteService,
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wires the state around `store`; toggles are scheduled on `runtime`.
    #[must_use]
    pub fn new(config: AppConfig, store: Arc<dyn TodoListStore>, runtime: Handle) -> Self {
        let locks = Arc::new(ToggleLockRegistry::new());
        let notifier = Arc::new(NotificationChannel::new());
        let toggles = ToggleCompleteService::new(
            Arc::clone(&store),
            Arc::clone(&locks),
            Arc::clone(&notifier),
            config.notification.retry,
            runtime,
        );

        Self {
            store,
            locks,
            notifier,
            toggles,
            config: Arc::new(config),
        }
    }

    /// State backed by an empty in-memory store.
    #[must_use]
    pub fn in_memory(config: AppConfig, runtime: Handle) -> Self {
        Self::new(config, Arc::new(InMemoryTodoListStore::new()), runtime)
    }
}

// =============================================================================
// Service Endpoints
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// GET /health
#[allow(clippy::unused_async)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Root banner response.
#[derive(Debug, Clone, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

/// GET /
#[allow(clippy::unused_async)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "TodoList API is running",
    })
}
