//! Domain module for todo lists.
//!
//! This module contains the list/todo model and the notification events
//! published while lists are being bulk-updated.

pub mod event;
pub mod todo_list;

pub use event::{NotificationEvent, TODO_LIST_NOT_FOUND};
pub use todo_list::{Todo, TodoId, TodoList, TodoListId, TodoPatch};
