//! Common test helpers for integration tests.
//!
//! # Note
//!
//! Each integration test file is compiled as its own crate, so helpers used
//! by only one of them would otherwise warn as dead code.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use todo_list_api::api::AppState;
use todo_list_api::domain::{Todo, TodoId, TodoList, TodoListId, TodoPatch};
use todo_list_api::infrastructure::{
    AppConfig, InMemoryTodoListStore, NotificationConfig, RetryPolicy, StoreError, Subscriber,
    SubscriberOutbox, TodoListStore,
};

// =============================================================================
// AppState Creation Helpers
// =============================================================================

/// Retry settings short enough to keep paused-clock tests readable.
pub const TEST_RETRY: RetryPolicy = RetryPolicy::new(10, Duration::from_millis(100));

/// Configuration used by every test state.
pub fn test_config() -> AppConfig {
    AppConfig {
        notification: NotificationConfig {
            retry: TEST_RETRY,
            ..NotificationConfig::default()
        },
        ..AppConfig::default()
    }
}

/// Creates a test `AppState` with an empty in-memory store.
pub fn create_test_app_state() -> AppState {
    AppState::in_memory(test_config(), Handle::current())
}

/// Creates a test `AppState` around a custom store.
pub fn create_test_app_state_with_store(store: Arc<dyn TodoListStore>) -> AppState {
    AppState::new(test_config(), store, Handle::current())
}

// =============================================================================
// Fixture Helpers
// =============================================================================

/// Creates lists until one with `list_id` exists and fills it with
/// `todo_count` incomplete todos.
pub fn create_list_with_id(
    store: &dyn TodoListStore,
    list_id: u64,
    todo_count: usize,
) -> TodoList {
    let mut list = store.create("List 1".to_string());
    while list.id.value() < list_id {
        list = store.create(format!("List {}", list.id.value() + 1));
    }
    for index in 0..todo_count {
        store
            .add_todo(list.id, format!("todo {}", index + 1), false)
            .unwrap();
    }
    store.get(list.id).unwrap()
}

/// Opens a connection and subscribes it to `list_id`.
pub fn subscribe(state: &AppState, list_id: TodoListId) -> (Subscriber, SubscriberOutbox) {
    let (subscriber, outbox) = state.notifier.open_connection();
    state.notifier.subscribe(list_id, subscriber.clone());
    (subscriber, outbox)
}

// =============================================================================
// Fault Injection
// =============================================================================

/// Store whose bulk toggle panics; every other call goes to an in-memory
/// store.
#[derive(Debug, Default)]
pub struct PanickingToggleStore {
    inner: InMemoryTodoListStore,
}

impl PanickingToggleStore {
    pub const PANIC_MESSAGE: &'static str = "disk on fire";
}

impl TodoListStore for PanickingToggleStore {
    fn all(&self) -> Vec<TodoList> {
        self.inner.all()
    }

    fn get(&self, list_id: TodoListId) -> Result<TodoList, StoreError> {
        self.inner.get(list_id)
    }

    fn create(&self, name: String) -> TodoList {
        self.inner.create(name)
    }

    fn rename(&self, list_id: TodoListId, name: String) -> Result<TodoList, StoreError> {
        self.inner.rename(list_id, name)
    }

    fn delete(&self, list_id: TodoListId) -> Result<(), StoreError> {
        self.inner.delete(list_id)
    }

    fn add_todo(
        &self,
        list_id: TodoListId,
        description: String,
        completed: bool,
    ) -> Result<Todo, StoreError> {
        self.inner.add_todo(list_id, description, completed)
    }

    fn update_todo(
        &self,
        list_id: TodoListId,
        todo_id: TodoId,
        patch: TodoPatch,
    ) -> Result<Todo, StoreError> {
        self.inner.update_todo(list_id, todo_id, patch)
    }

    fn delete_todo(&self, list_id: TodoListId, todo_id: TodoId) -> Result<(), StoreError> {
        self.inner.delete_todo(list_id, todo_id)
    }

    fn set_all_completed(
        &self,
        _list_id: TodoListId,
        _completed: bool,
    ) -> Result<usize, StoreError> {
        panic!("{}", Self::PANIC_MESSAGE)
    }
}
