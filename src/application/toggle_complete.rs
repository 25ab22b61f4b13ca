//! Background bulk toggle of a list's todos.
//!
//! Accepting a toggle takes the list's lock and schedules a [`ToggleTask`] on
//! the runtime; the caller gets an acknowledgement immediately. The task
//! runs the mutation on a blocking worker, hands the result back to the
//! runtime, queues the outcome event on the notification channel and only
//! then releases the lock.
//!
//! ```text
//! accept_toggle ──lock──▶ Locked ──spawn──▶ Running ─┬─▶ Succeeded ─┐
//!                                                   └─▶ Failed ────┴─▶ dispatch event ─▶ unlock
//! ```

use std::any::Any;
use std::sync::Arc;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinHandle};

use crate::domain::{NotificationEvent, TODO_LIST_NOT_FOUND, TodoListId};
use crate::infrastructure::{
    BroadcastOutcome, NotificationChannel, RetryPolicy, StoreError, TodoListStore,
    ToggleLockGuard, ToggleLockRegistry,
};

// =============================================================================
// Errors and Acknowledgements
// =============================================================================

/// Reasons a toggle request is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ToggleError {
    /// Another toggle of the same list has not finished yet.
    #[error("A toggle for todo list with ID:{0} is already in progress")]
    InProgress(TodoListId),
}

/// Acknowledgement that a toggle was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleAccepted {
    /// The list being toggled.
    pub list_id: TodoListId,
}

// =============================================================================
// Outcome
// =============================================================================

/// Terminal state of a toggle task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Every todo now has `completed`.
    Succeeded { completed: bool, updated: usize },
    /// The list was missing or the mutation failed.
    Failed { error: String },
}

impl ToggleOutcome {
    fn from_store(result: Result<usize, StoreError>, completed: bool) -> Self {
        match result {
            Ok(updated) => Self::Succeeded { completed, updated },
            Err(StoreError::TodoListNotFound(_)) => Self::Failed {
                error: TODO_LIST_NOT_FOUND.to_string(),
            },
            Err(error) => Self::Failed {
                error: error.to_string(),
            },
        }
    }

    fn from_join_error(error: JoinError) -> Self {
        let error = if error.is_panic() {
            panic_message(error.into_panic())
        } else {
            error.to_string()
        };
        Self::Failed { error }
    }

    /// The event announcing this outcome for `list_id`.
    #[must_use]
    pub fn to_event(&self, list_id: TodoListId) -> NotificationEvent {
        match self {
            Self::Succeeded { completed, .. } => NotificationEvent::toggle_done(list_id, *completed),
            Self::Failed { error } => NotificationEvent::toggle_error(list_id, error.clone()),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "toggle task panicked".to_string())
}

/// What a finished task did.
#[derive(Debug)]
pub struct ToggleReport {
    /// Terminal state.
    pub outcome: ToggleOutcome,
    /// Event queued for subscribers.
    pub event: NotificationEvent,
    /// The scheduled delivery; resolves once the event was broadcast or
    /// dropped.
    pub delivery: JoinHandle<BroadcastOutcome>,
}

// =============================================================================
// Toggle Task
// =============================================================================

/// One background toggle of one list.
///
/// The task owns the list's lock from construction on and releases it after
/// its outcome event has been queued, whichever branch it took.
pub struct ToggleTask {
    store: Arc<dyn TodoListStore>,
    notifier: Arc<NotificationChannel>,
    retry: RetryPolicy,
    runtime: Handle,
    lock: ToggleLockGuard,
    completed: bool,
}

impl ToggleTask {
    /// Creates a task that adopts the already-held `lock`.
    #[must_use]
    pub fn new(
        store: Arc<dyn TodoListStore>,
        notifier: Arc<NotificationChannel>,
        retry: RetryPolicy,
        runtime: Handle,
        lock: ToggleLockGuard,
        completed: bool,
    ) -> Self {
        Self {
            store,
            notifier,
            retry,
            runtime,
            lock,
            completed,
        }
    }

    /// Runs the task to completion.
    pub async fn run(self) -> ToggleReport {
        let Self {
            store,
            notifier,
            retry,
            runtime,
            lock,
            completed,
        } = self;
        let list_id = lock.list_id();

        let mutation = runtime.spawn_blocking(move || store.set_all_completed(list_id, completed));
        let outcome = match mutation.await {
            Ok(result) => ToggleOutcome::from_store(result, completed),
            Err(error) => ToggleOutcome::from_join_error(error),
        };

        match &outcome {
            ToggleOutcome::Succeeded { updated, .. } => {
                tracing::info!(%list_id, completed, updated, "Toggle complete");
            }
            ToggleOutcome::Failed { error } => {
                tracing::warn!(%list_id, completed, %error, "Toggle failed");
            }
        }

        let event = outcome.to_event(list_id);
        let delivery = {
            let event = event.clone();
            runtime.spawn(async move { notifier.broadcast_with_policy(list_id, event, retry).await })
        };

        lock.release();

        ToggleReport {
            outcome,
            event,
            delivery,
        }
    }
}

// =============================================================================
// Toggle Service
// =============================================================================

/// Entry point used by request handlers to start background toggles.
#[derive(Clone)]
pub struct ToggleCompleteService {
    store: Arc<dyn TodoListStore>,
    locks: Arc<ToggleLockRegistry>,
    notifier: Arc<NotificationChannel>,
    retry: RetryPolicy,
    runtime: Handle,
}

impl ToggleCompleteService {
    /// Creates the service.
    ///
    /// `runtime` is where toggle tasks and event deliveries are scheduled.
    #[must_use]
    pub fn new(
        store: Arc<dyn TodoListStore>,
        locks: Arc<ToggleLockRegistry>,
        notifier: Arc<NotificationChannel>,
        retry: RetryPolicy,
        runtime: Handle,
    ) -> Self {
        Self {
            store,
            locks,
            notifier,
            retry,
            runtime,
        }
    }

    /// Returns true while a toggle of `list_id` is in flight.
    #[must_use]
    pub fn is_toggling(&self, list_id: TodoListId) -> bool {
        self.locks.is_locked(list_id)
    }

    /// Locks `list_id` and schedules a background toggle.
    ///
    /// Returns immediately. The outcome is only reported through the
    /// notification channel.
    ///
    /// # Errors
    ///
    /// Returns [`ToggleError::InProgress`] if the list is already locked.
    pub fn accept_toggle(
        &self,
        list_id: TodoListId,
        completed: bool,
    ) -> Result<ToggleAccepted, ToggleError> {
        self.schedule(list_id, completed).map(|_| ToggleAccepted { list_id })
    }

    /// Like [`accept_toggle`](Self::accept_toggle) but hands back the
    /// task's join handle.
    ///
    /// # Errors
    ///
    /// Returns [`ToggleError::InProgress`] if the list is already locked.
    pub fn schedule(
        &self,
        list_id: TodoListId,
        completed: bool,
    ) -> Result<JoinHandle<ToggleReport>, ToggleError> {
        if !self.locks.try_lock(list_id) {
            tracing::warn!(%list_id, "Toggle rejected, already in progress");
            return Err(ToggleError::InProgress(list_id));
        }

        let task = ToggleTask::new(
            Arc::clone(&self.store),
            Arc::clone(&self.notifier),
            self.retry,
            self.runtime.clone(),
            ToggleLockGuard::adopt(Arc::clone(&self.locks), list_id),
            completed,
        );
        tracing::info!(%list_id, completed, "Toggle accepted");
        Ok(self.runtime.spawn(task.run()))
    }
}
