//! Todo list domain model.
//!
//! A [`TodoList`] owns an ordered sequence of [`Todo`] items. Todos have no
//! lifecycle of their own and are only reachable through their list.

use serde::{Deserialize, Serialize};

// =============================================================================
// Value Objects - Newtypes
// =============================================================================

/// Identifier of a todo list.
///
/// Assigned sequentially by the store, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoListId(u64);

impl TodoListId {
    /// Creates a `TodoListId` from a raw integer.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TodoListId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Identifier of a todo, unique within its owning list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// Creates a `TodoId` from a raw integer.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

// =============================================================================
// Todo
// =============================================================================

/// A single item of a todo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Identifier within the owning list.
    pub id: TodoId,
    /// Free-form description, never blank.
    pub description: String,
    /// Whether the item has been completed.
    pub completed: bool,
}

impl Todo {
    /// Creates a new todo.
    #[must_use]
    pub fn new(id: TodoId, description: impl Into<String>, completed: bool) -> Self {
        Self {
            id,
            description: description.into(),
            completed,
        }
    }
}

/// Partial update of a todo. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement completion flag.
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Returns true if the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.description.is_none() && self.completed.is_none()
    }
}

// =============================================================================
// TodoList
// =============================================================================

/// A named, ordered collection of todos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    /// List identifier.
    pub id: TodoListId,
    /// Display name.
    pub name: String,
    /// Items in insertion order.
    pub todos: Vec<Todo>,
}

impl TodoList {
    /// Creates an empty list.
    #[must_use]
    pub fn new(id: TodoListId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            todos: Vec::new(),
        }
    }

    /// Returns the id the next appended todo will receive (max + 1, from 1).
    #[must_use]
    pub fn next_todo_id(&self) -> TodoId {
        let max = self.todos.iter().map(|todo| todo.id.value()).max().unwrap_or(0);
        TodoId::new(max + 1)
    }

    /// Appends a new todo and returns a copy of it.
    pub fn add_todo(&mut self, description: impl Into<String>, completed: bool) -> Todo {
        let todo = Todo::new(self.next_todo_id(), description, completed);
        self.todos.push(todo.clone());
        todo
    }

    /// Looks up a todo by id.
    #[must_use]
    pub fn todo(&self, todo_id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == todo_id)
    }

    /// Applies `patch` to the todo with the given id.
    ///
    /// Returns the updated todo, or `None` if no such todo exists.
    pub fn update_todo(&mut self, todo_id: TodoId, patch: TodoPatch) -> Option<Todo> {
        let todo = self.todos.iter_mut().find(|todo| todo.id == todo_id)?;
        if let Some(description) = patch.description {
            todo.description = description;
        }
        if let Some(completed) = patch.completed {
            todo.completed = completed;
        }
        Some(todo.clone())
    }

    /// Removes the todo with the given id. Returns true if one was removed.
    pub fn remove_todo(&mut self, todo_id: TodoId) -> bool {
        let before = self.todos.len();
        self.todos.retain(|todo| todo.id != todo_id);
        self.todos.len() != before
    }

    /// Sets `completed` on every todo, leaving ids and descriptions alone.
    ///
    /// Returns the number of todos touched.
    pub fn set_all_completed(&mut self, completed: bool) -> usize {
        for todo in &mut self.todos {
            todo.completed = completed;
        }
        self.todos.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn list_with(descriptions: &[&str]) -> TodoList {
        let mut list = TodoList::new(TodoListId::new(1), "Groceries");
        for description in descriptions {
            list.add_todo(*description, false);
        }
        list
    }

    #[rstest]
    fn next_todo_id_starts_at_one() {
        let list = TodoList::new(TodoListId::new(1), "Empty");
        assert_eq!(list.next_todo_id(), TodoId::new(1));
    }

    #[rstest]
    fn next_todo_id_is_max_plus_one_after_removal() {
        let mut list = list_with(&["milk", "eggs", "bread"]);
        assert!(list.remove_todo(TodoId::new(2)));

        assert_eq!(list.next_todo_id(), TodoId::new(4));

        assert!(list.remove_todo(TodoId::new(3)));
        assert_eq!(list.next_todo_id(), TodoId::new(2));
    }

    #[rstest]
    fn update_todo_keeps_unpatched_fields() {
        let mut list = list_with(&["milk"]);

        let updated = list
            .update_todo(
                TodoId::new(1),
                TodoPatch {
                    description: None,
                    completed: Some(true),
                },
            )
            .unwrap();

        assert_eq!(updated.description, "milk");
        assert!(updated.completed);
    }

    #[rstest]
    fn update_todo_missing_returns_none() {
        let mut list = list_with(&["milk"]);
        assert!(list.update_todo(TodoId::new(7), TodoPatch::default()).is_none());
    }

    #[rstest]
    fn remove_todo_missing_returns_false() {
        let mut list = list_with(&["milk"]);
        assert!(!list.remove_todo(TodoId::new(9)));
        assert_eq!(list.todos.len(), 1);
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn set_all_completed_only_touches_flag(#[case] completed: bool) {
        let mut list = list_with(&["milk", "eggs"]);
        list.todos[0].completed = !completed;
        let before = list.clone();

        let touched = list.set_all_completed(completed);

        assert_eq!(touched, 2);
        for (after, before) in list.todos.iter().zip(&before.todos) {
            assert_eq!(after.id, before.id);
            assert_eq!(after.description, before.description);
            assert_eq!(after.completed, completed);
        }
    }

    #[rstest]
    fn ids_serialize_as_plain_integers() {
        let todo = Todo::new(TodoId::new(3), "milk", false);
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 3, "description": "milk", "completed": false})
        );
    }
}
