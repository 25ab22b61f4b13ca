//! Notification events pushed to WebSocket subscribers.

use serde::{Deserialize, Serialize};

use super::TodoListId;

/// Error text for a toggle that targets a list which no longer exists.
pub const TODO_LIST_NOT_FOUND: &str = "TodoList not found";

/// Event delivered over a per-list notification connection.
///
/// Serialized as a JSON object tagged by `event`:
///
/// ```json
/// {"event": "ping"}
/// {"event": "toggle_complete_done", "listId": 5, "completed": true}
/// {"event": "toggle_complete_error", "listId": 9, "error": "TodoList not found"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// Keepalive sent after an idle period.
    Ping,
    /// A bulk toggle finished and every todo now has `completed`.
    ToggleCompleteDone {
        #[serde(rename = "listId")]
        list_id: TodoListId,
        completed: bool,
    },
    /// A bulk toggle failed.
    ToggleCompleteError {
        #[serde(rename = "listId")]
        list_id: TodoListId,
        error: String,
    },
}

impl NotificationEvent {
    /// Builds the success event of a toggle.
    #[must_use]
    pub const fn toggle_done(list_id: TodoListId, completed: bool) -> Self {
        Self::ToggleCompleteDone { list_id, completed }
    }

    /// Builds the failure event of a toggle.
    #[must_use]
    pub fn toggle_error(list_id: TodoListId, error: impl Into<String>) -> Self {
        Self::ToggleCompleteError {
            list_id,
            error: error.into(),
        }
    }

    /// Returns the wire name of the event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::ToggleCompleteDone { .. } => "toggle_complete_done",
            Self::ToggleCompleteError { .. } => "toggle_complete_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn ping_serializes_to_tag_only() {
        let value = serde_json::to_value(NotificationEvent::Ping).unwrap();
        assert_eq!(value, json!({"event": "ping"}));
    }

    #[rstest]
    fn toggle_done_uses_camel_case_list_id() {
        let event = NotificationEvent::toggle_done(TodoListId::new(5), true);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"event": "toggle_complete_done", "listId": 5, "completed": true})
        );
    }

    #[rstest]
    fn toggle_error_carries_message() {
        let event = NotificationEvent::toggle_error(TodoListId::new(9), TODO_LIST_NOT_FOUND);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"event": "toggle_complete_error", "listId": 9, "error": "TodoList not found"})
        );
    }

    #[rstest]
    #[case(NotificationEvent::Ping, "ping")]
    #[case(
        NotificationEvent::toggle_done(TodoListId::new(2), false),
        "toggle_complete_done"
    )]
    #[case(
        NotificationEvent::toggle_error(TodoListId::new(3), "boom"),
        "toggle_complete_error"
    )]
    fn name_matches_wire_tag(#[case] event: NotificationEvent, #[case] name: &str) {
        assert_eq!(event.name(), name);
        assert_eq!(serde_json::to_value(&event).unwrap()["event"], name);
    }

    #[rstest]
    fn deserializes_from_wire_shape() {
        let event: NotificationEvent = serde_json::from_value(
            json!({"event": "toggle_complete_done", "listId": 4, "completed": false}),
        )
        .unwrap();
        assert_eq!(event, NotificationEvent::toggle_done(TodoListId::new(4), false));
    }
}
