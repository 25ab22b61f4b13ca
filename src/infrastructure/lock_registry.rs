//! Per-list toggle locks.
//!
//! The registry is an advisory, in-process set of list ids that currently
//! have a background toggle in flight. It does not survive a restart.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::TodoListId;

/// Set of list ids with a pending background toggle.
#[derive(Debug, Default)]
pub struct ToggleLockRegistry {
    locked: Mutex<HashSet<TodoListId>>,
}

impl ToggleLockRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true iff `list_id` is currently marked busy.
    #[must_use]
    pub fn is_locked(&self, list_id: TodoListId) -> bool {
        self.locked.lock().contains(&list_id)
    }

    /// Marks `list_id` busy. Idempotent.
    pub fn lock(&self, list_id: TodoListId) {
        self.locked.lock().insert(list_id);
    }

    /// Clears the busy mark of `list_id`. Idempotent.
    pub fn unlock(&self, list_id: TodoListId) {
        self.locked.lock().remove(&list_id);
    }

    /// Marks `list_id` busy unless it already is.
    ///
    /// Returns false if the list was already locked. The check and the
    /// insert happen under one lock acquisition.
    pub fn try_lock(&self, list_id: TodoListId) -> bool {
        self.locked.lock().insert(list_id)
    }

    /// Number of lists currently locked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locked.lock().len()
    }

    /// Returns true if no list is locked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locked.lock().is_empty()
    }
}

/// Releases a list's toggle lock when dropped.
///
/// The guard does not acquire the lock; it takes over one that the caller
/// already holds. Release happens at most once, either through
/// [`ToggleLockGuard::release`] or on drop (including unwinding).
#[derive(Debug)]
#[must_use = "dropping the guard releases the lock immediately"]
pub struct ToggleLockGuard {
    registry: Arc<ToggleLockRegistry>,
    list_id: TodoListId,
    released: bool,
}

impl ToggleLockGuard {
    /// Takes ownership of the already-held lock on `list_id`.
    pub fn adopt(registry: Arc<ToggleLockRegistry>, list_id: TodoListId) -> Self {
        Self {
            registry,
            list_id,
            released: false,
        }
    }

    /// The list this guard unlocks.
    #[must_use]
    pub const fn list_id(&self) -> TodoListId {
        self.list_id
    }

    /// Unlocks now instead of at drop.
    pub fn release(mut self) {
        self.unlock_once();
    }

    fn unlock_once(&mut self) {
        if !self.released {
            self.released = true;
            self.registry.unlock(self.list_id);
            tracing::debug!(list_id = %self.list_id, "Toggle lock released");
        }
    }
}

impl Drop for ToggleLockGuard {
    fn drop(&mut self) {
        self.unlock_once();
    }
}
