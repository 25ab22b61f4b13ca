//! Todo list storage.
//!
//! [`TodoListStore`] is the capability the rest of the crate consumes to read
//! and mutate list state. [`InMemoryTodoListStore`] is the only backend: all
//! state lives behind a single `RwLock` and is lost on restart.

use parking_lot::RwLock;
use thiserror::Error;

use crate::domain::{Todo, TodoId, TodoList, TodoListId, TodoPatch};

// =============================================================================
// Store Error
// =============================================================================

/// Errors that can occur during store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The todo list does not exist.
    #[error("Todo list with ID:{0} not found")]
    TodoListNotFound(TodoListId),

    /// The list exists but has no todo with the given id.
    #[error("Todo with ID:{todo_id} from todo list with ID:{list_id} not found")]
    TodoNotFound {
        list_id: TodoListId,
        todo_id: TodoId,
    },
}

// =============================================================================
// Store Trait
// =============================================================================

/// Read/mutate access to todo lists and their todos.
///
/// Implementations must be safe to call from request handlers and from
/// blocking worker threads at the same time.
pub trait TodoListStore: Send + Sync {
    /// Returns every list in creation order.
    fn all(&self) -> Vec<TodoList>;

    /// Returns a snapshot of one list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TodoListNotFound`] if the list does not exist.
    fn get(&self, list_id: TodoListId) -> Result<TodoList, StoreError>;

    /// Creates an empty list with the next sequential id.
    fn create(&self, name: String) -> TodoList;

    /// Renames a list, keeping its todos.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TodoListNotFound`] if the list does not exist.
    fn rename(&self, list_id: TodoListId, name: String) -> Result<TodoList, StoreError>;

    /// Deletes a list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TodoListNotFound`] if the list does not exist.
    fn delete(&self, list_id: TodoListId) -> Result<(), StoreError>;

    /// Appends a todo to a list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TodoListNotFound`] if the list does not exist.
    fn add_todo(
        &self,
        list_id: TodoListId,
        description: String,
        completed: bool,
    ) -> Result<Todo, StoreError>;

    /// Applies a partial update to a todo.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TodoListNotFound`] or [`StoreError::TodoNotFound`].
    fn update_todo(
        &self,
        list_id: TodoListId,
        todo_id: TodoId,
        patch: TodoPatch,
    ) -> Result<Todo, StoreError>;

    /// Removes a todo.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TodoListNotFound`] or [`StoreError::TodoNotFound`].
    fn delete_todo(&self, list_id: TodoListId, todo_id: TodoId) -> Result<(), StoreError>;

    /// Sets `completed` on every todo of a list in one step.
    ///
    /// Returns the number of todos touched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TodoListNotFound`] if the list does not exist.
    fn set_all_completed(&self, list_id: TodoListId, completed: bool)
    -> Result<usize, StoreError>;
}

// =============================================================================
// In-Memory Store
// =============================================================================

#[derive(Debug)]
struct StoreState {
    lists: Vec<TodoList>,
    next_id: u64,
}

impl StoreState {
    fn find(&self, list_id: TodoListId) -> Result<&TodoList, StoreError> {
        self.lists
            .iter()
            .find(|list| list.id == list_id)
            .ok_or(StoreError::TodoListNotFound(list_id))
    }

    fn find_mut(&mut self, list_id: TodoListId) -> Result<&mut TodoList, StoreError> {
        self.lists
            .iter_mut()
            .find(|list| list.id == list_id)
            .ok_or(StoreError::TodoListNotFound(list_id))
    }
}

/// In-memory implementation of [`TodoListStore`].
///
/// # Example
///
/// ```
/// use todo_list_api::infrastructure::{InMemoryTodoListStore, TodoListStore};
///
/// let store = InMemoryTodoListStore::new();
/// let list = store.create("Groceries".to_string());
/// store.add_todo(list.id, "milk".to_string(), false).unwrap();
///
/// assert_eq!(store.get(list.id).unwrap().todos.len(), 1);
/// ```
#[derive(Debug)]
pub struct InMemoryTodoListStore {
    state: RwLock<StoreState>,
}

impl InMemoryTodoListStore {
    /// Creates an empty store. The first list gets id 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                lists: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryTodoListStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoListStore for InMemoryTodoListStore {
    fn all(&self) -> Vec<TodoList> {
        self.state.read().lists.clone()
    }

    fn get(&self, list_id: TodoListId) -> Result<TodoList, StoreError> {
        self.state.read().find(list_id).cloned()
    }

    fn create(&self, name: String) -> TodoList {
        let mut state = self.state.write();
        let list = TodoList::new(TodoListId::new(state.next_id), name);
        state.next_id += 1;
        state.lists.push(list.clone());
        list
    }

    fn rename(&self, list_id: TodoListId, name: String) -> Result<TodoList, StoreError> {
        let mut state = self.state.write();
        let list = state.find_mut(list_id)?;
        list.name = name;
        Ok(list.clone())
    }

    fn delete(&self, list_id: TodoListId) -> Result<(), StoreError> {
        let mut state = self.state.write();
        let before = state.lists.len();
        state.lists.retain(|list| list.id != list_id);
        if state.lists.len() == before {
            return Err(StoreError::TodoListNotFound(list_id));
        }
        Ok(())
    }

    fn add_todo(
        &self,
        list_id: TodoListId,
        description: String,
        completed: bool,
    ) -> Result<Todo, StoreError> {
        let mut state = self.state.write();
        Ok(state.find_mut(list_id)?.add_todo(description, completed))
    }

    fn update_todo(
        &self,
        list_id: TodoListId,
        todo_id: TodoId,
        patch: TodoPatch,
    ) -> Result<Todo, StoreError> {
        let mut state = self.state.write();
        state
            .find_mut(list_id)?
            .update_todo(todo_id, patch)
            .ok_or(StoreError::TodoNotFound { list_id, todo_id })
    }

    fn delete_todo(&self, list_id: TodoListId, todo_id: TodoId) -> Result<(), StoreError> {
        let mut state = self.state.write();
        if state.find_mut(list_id)?.remove_todo(todo_id) {
            Ok(())
        } else {
            Err(StoreError::TodoNotFound { list_id, todo_id })
        }
    }

    fn set_all_completed(
        &self,
        list_id: TodoListId,
        completed: bool,
    ) -> Result<usize, StoreError> {
        let mut state = self.state.write();
        Ok(state.find_mut(list_id)?.set_all_completed(completed))
    }
}
