//! Data Transfer Objects for API requests and responses.
//!
//! This module contains DTOs that are separate from domain models,
//! providing a clean API contract, plus the request validation rules.

use serde::{Deserialize, Serialize};

use super::error::{FieldError, ValidationError};
use crate::domain::{Todo, TodoList, TodoPatch};

// =============================================================================
// Todo List DTOs
// =============================================================================

/// Request DTO for creating a todo list.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodoListRequest {
    /// Name of the list.
    pub name: String,
}

/// Request DTO for renaming a todo list.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTodoListRequest {
    /// New name of the list.
    pub name: String,
}

/// Response DTO for a todo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoListResponse {
    /// List ID.
    pub id: u64,
    /// List name.
    pub name: String,
    /// Items of the list.
    pub todos: Vec<TodoResponse>,
}

impl From<&TodoList> for TodoListResponse {
    fn from(list: &TodoList) -> Self {
        Self {
            id: list.id.value(),
            name: list.name.clone(),
            todos: list.todos.iter().map(TodoResponse::from).collect(),
        }
    }
}

impl From<TodoList> for TodoListResponse {
    fn from(list: TodoList) -> Self {
        Self::from(&list)
    }
}

// =============================================================================
// Todo DTOs
// =============================================================================

/// Request DTO for creating a todo.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodoRequest {
    /// Description, required and non-blank.
    #[serde(default)]
    pub description: Option<String>,
    /// Initial completion flag (defaults to false).
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Request DTO for updating a todo. At least one field must be present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodoRequest {
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New completion flag.
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Response DTO for a todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoResponse {
    /// Todo ID, unique within its list.
    pub id: u64,
    /// Description.
    pub description: String,
    /// Completion flag.
    pub completed: bool,
}

impl From<&Todo> for TodoResponse {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id.value(),
            description: todo.description.clone(),
            completed: todo.completed,
        }
    }
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self::from(&todo)
    }
}

// =============================================================================
// Toggle DTOs
// =============================================================================

/// Request DTO for the bulk completion toggle.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ToggleCompleteRequest {
    /// Value to set on every todo of the list.
    pub completed: bool,
}

/// Response DTO acknowledging a scheduled toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleCompleteAcceptedResponse {
    /// Always `"accepted"`.
    pub status: String,
    /// The list being toggled.
    pub todo_list_id: u64,
}

impl ToggleCompleteAcceptedResponse {
    /// Builds the acknowledgement for `todo_list_id`.
    #[must_use]
    pub fn accepted(todo_list_id: u64) -> Self {
        Self {
            status: "accepted".to_string(),
            todo_list_id,
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Validated todo creation data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCreateTodo {
    pub description: String,
    pub completed: bool,
}

/// Validates a todo list name: must not be blank.
///
/// # Errors
///
/// Returns [`ValidationError`] if the name is empty after trimming.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::single("name", "name cannot be empty"));
    }
    Ok(name.to_string())
}

/// Validates a todo description: must not be blank.
///
/// # Errors
///
/// Returns [`ValidationError`] if the description is empty after trimming.
pub fn validate_description(description: &str) -> Result<String, ValidationError> {
    if description.trim().is_empty() {
        return Err(ValidationError::single(
            "description",
            "description cannot be empty",
        ));
    }
    Ok(description.to_string())
}

/// Validates a todo creation request.
///
/// # Errors
///
/// Returns [`ValidationError`] if the description is missing or blank.
pub fn validate_create_todo(
    request: &CreateTodoRequest,
) -> Result<ValidatedCreateTodo, ValidationError> {
    let description = request.description.as_deref().map_or_else(
        || {
            Err(ValidationError::single(
                "description",
                "description is required",
            ))
        },
        validate_description,
    )?;

    Ok(ValidatedCreateTodo {
        description,
        completed: request.completed.unwrap_or(false),
    })
}

/// Validates a todo update request into a patch.
///
/// # Errors
///
/// Returns [`ValidationError`] if no field is present or the description is
/// blank.
pub fn validate_update_todo(request: &UpdateTodoRequest) -> Result<TodoPatch, ValidationError> {
    let mut errors = Vec::new();

    if request.description.is_none() && request.completed.is_none() {
        errors.push(FieldError::new(
            "body",
            "At least one field must be provided",
        ));
    }

    let description = match request.description.as_deref().map(validate_description) {
        Some(Ok(description)) => Some(description),
        Some(Err(error)) => {
            errors.extend(error.errors);
            None
        }
        None => None,
    };

    if !errors.is_empty() {
        return Err(ValidationError::new(errors));
    }

    Ok(TodoPatch {
        description,
        completed: request.completed,
    })
}
