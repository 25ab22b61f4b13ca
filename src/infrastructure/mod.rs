//! Infrastructure module.
//!
//! Storage, per-list locks, the WebSocket notification channel and
//! configuration loading.

pub mod config;
pub mod lock_registry;
pub mod notification;
pub mod store;

pub use config::{AppConfig, ConfigError, NotificationConfig};
pub use lock_registry::{ToggleLockGuard, ToggleLockRegistry};
pub use notification::{
    BroadcastOutcome, DeliveryError, NotificationChannel, RetryPolicy, Subscriber, SubscriberId,
    SubscriberOutbox,
};
pub use store::{InMemoryTodoListStore, StoreError, TodoListStore};
