//! WebSocket endpoint streaming a list's notification events.
//!
//! `GET /ws/todolists/{id}` upgrades to a socket that receives every event
//! broadcast for the list as a JSON text frame. The server never reads
//! payloads from the client; incoming frames only reset the idle timer, and
//! after a full idle period a `{"event":"ping"}` frame is sent.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade, rejection::WebSocketUpgradeRejection},
    },
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use futures::{Sink, SinkExt, Stream, StreamExt};

use super::handlers::AppState;
use crate::domain::{NotificationEvent, TodoListId};
use crate::infrastructure::NotificationChannel;

/// GET /ws/todolists/{id}
///
/// Answers `403 Forbidden` before upgrading when the `Origin` header is
/// missing or not in the configured allow-list.
pub async fn todo_list_socket(
    State(state): State<AppState>,
    Path(list_id): Path<u64>,
    headers: HeaderMap,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok());

    if !origin.is_some_and(|origin| state.config.is_origin_allowed(origin)) {
        tracing::warn!(list_id, ?origin, "WebSocket origin rejected");
        return StatusCode::FORBIDDEN.into_response();
    }

    let upgrade = match upgrade {
        Ok(upgrade) => upgrade,
        Err(rejection) => return rejection.into_response(),
    };

    let list_id = TodoListId::new(list_id);
    let notifier = Arc::clone(&state.notifier);
    let idle_timeout = state.config.notification.idle_timeout;

    upgrade.on_upgrade(move |socket: WebSocket| async move {
        let (outgoing, incoming) = socket.split();
        serve_connection(incoming, outgoing, list_id, notifier, idle_timeout).await;
    })
}

/// Drives one subscriber connection until either side closes it.
///
/// Registers a subscriber for `list_id`, forwards its events to `outgoing`
/// and unregisters it on exit.
pub async fn serve_connection<I, O>(
    mut incoming: I,
    mut outgoing: O,
    list_id: TodoListId,
    notifier: Arc<NotificationChannel>,
    idle_timeout: Duration,
) where
    I: Stream<Item = Result<Message, axum::Error>> + Unpin,
    O: Sink<Message> + Unpin + Send + 'static,
{
    let (subscriber, mut outbox) = notifier.open_connection();
    let subscriber_id = subscriber.id();
    notifier.subscribe(list_id, subscriber.clone());
    tracing::info!(%list_id, subscriber_id, "WebSocket connected");

    let mut writer = tokio::spawn(async move {
        while let Some(event) = outbox.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(error) => {
                    tracing::error!(%error, event = event.name(), "Failed to encode event");
                    continue;
                }
            };
            if outgoing.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            _ = &mut writer => break,
            received = tokio::time::timeout(idle_timeout, incoming.next()) => match received {
                Err(_) => {
                    if subscriber.send(NotificationEvent::Ping).is_err() {
                        break;
                    }
                }
                Ok(None | Some(Err(_) | Ok(Message::Close(_)))) => break,
                Ok(Some(Ok(_))) => {}
            },
        }
    }

    notifier.unsubscribe(list_id, subscriber_id);
    writer.abort();
    tracing::info!(%list_id, subscriber_id, "WebSocket disconnected");
}
