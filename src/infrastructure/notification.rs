//! Per-list notification channel.
//!
//! The channel keeps, for every list id, the set of live subscriber
//! connections and delivers [`NotificationEvent`]s to all of them.
//!
//! # Delivery model
//!
//! Each subscriber owns an unbounded queue (its outbox). Broadcasting pushes
//! the event onto every outbox while holding the registry lock, so events for
//! one list reach each subscriber in broadcast order. The connection task that
//! owns the outbox writes events to the socket. When that task is gone the
//! push fails and the subscriber is unsubscribed on the spot; other
//! subscribers are unaffected.
//!
//! # Registry invariant
//!
//! A list id has an entry in the registry iff it has at least one subscriber.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::{NotificationEvent, TodoListId};

// =============================================================================
// Subscriber
// =============================================================================

/// Identifier of one subscriber connection, unique per channel.
pub type SubscriberId = u64;

/// Receiving half of a subscriber connection.
pub type SubscriberOutbox = mpsc::UnboundedReceiver<NotificationEvent>;

/// The subscriber's connection is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("subscriber {0} is no longer connected")]
pub struct DeliveryError(pub SubscriberId);

/// Sending half of a subscriber connection.
#[derive(Debug, Clone)]
pub struct Subscriber {
    id: SubscriberId,
    sender: mpsc::UnboundedSender<NotificationEvent>,
}

impl Subscriber {
    /// The connection id.
    #[must_use]
    pub const fn id(&self) -> SubscriberId {
        self.id
    }

    /// Queues `event` for this connection.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] if the connection's outbox has been dropped.
    pub fn send(&self, event: NotificationEvent) -> Result<(), DeliveryError> {
        self.sender.send(event).map_err(|_| DeliveryError(self.id))
    }
}

// =============================================================================
// Retry Policy
// =============================================================================

/// Fixed-count, fixed-delay retry used while a list has no subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of times the subscriber set is checked before giving up.
    pub max_attempts: u32,
    /// Wait after each attempt that found no subscriber.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Default number of attempts.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
    /// Default delay between attempts.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

    /// Creates a policy.
    #[must_use]
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_DELAY)
    }
}

/// Result of [`NotificationChannel::broadcast_with_retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastOutcome {
    /// Subscribers were present on `attempt` (1-based) and the event was
    /// pushed to `recipients` of them.
    Delivered { attempt: u32, recipients: usize },
    /// No subscriber showed up within `attempts` attempts.
    GaveUp { attempts: u32 },
}

impl BroadcastOutcome {
    /// Returns true if the event reached at least one subscriber.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { recipients, .. } if *recipients > 0)
    }
}

// =============================================================================
// Notification Channel
// =============================================================================

type Registry = HashMap<TodoListId, HashMap<SubscriberId, Subscriber>>;

/// Per-list subscriber registry and broadcaster.
#[derive(Debug, Default)]
pub struct NotificationChannel {
    subscribers: Mutex<Registry>,
    next_subscriber_id: AtomicU64,
}

impl NotificationChannel {
    /// Creates a channel with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new connection: the handle to register and the outbox its
    /// owner reads from.
    pub fn open_connection(&self) -> (Subscriber, SubscriberOutbox) {
        let id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (sender, outbox) = mpsc::unbounded_channel();
        (Subscriber { id, sender }, outbox)
    }

    /// Registers `subscriber` as a listener for `list_id`.
    pub fn subscribe(&self, list_id: TodoListId, subscriber: Subscriber) {
        let subscriber_id = subscriber.id();
        let mut registry = self.subscribers.lock();
        let subscribers = registry.entry(list_id).or_default();
        subscribers.insert(subscriber_id, subscriber);
        tracing::debug!(
            %list_id,
            subscriber_id,
            subscribers = subscribers.len(),
            "Subscriber connected"
        );
    }

    /// Removes a subscriber. No-op if it (or the list entry) is absent.
    pub fn unsubscribe(&self, list_id: TodoListId, subscriber_id: SubscriberId) {
        let mut registry = self.subscribers.lock();
        Self::remove_locked(&mut registry, list_id, subscriber_id);
    }

    fn remove_locked(registry: &mut Registry, list_id: TodoListId, subscriber_id: SubscriberId) {
        let Some(subscribers) = registry.get_mut(&list_id) else {
            return;
        };
        if subscribers.remove(&subscriber_id).is_some() {
            tracing::debug!(%list_id, subscriber_id, "Subscriber disconnected");
        }
        if subscribers.is_empty() {
            registry.remove(&list_id);
        }
    }

    /// Number of subscribers currently registered for `list_id`.
    #[must_use]
    pub fn subscriber_count(&self, list_id: TodoListId) -> usize {
        self.subscribers.lock().get(&list_id).map_or(0, HashMap::len)
    }

    /// Returns true if `list_id` has a registry entry.
    #[must_use]
    pub fn is_registered(&self, list_id: TodoListId) -> bool {
        self.subscribers.lock().contains_key(&list_id)
    }

    /// Delivers `event` to every subscriber of `list_id`.
    ///
    /// Subscribers whose connection is gone are unsubscribed; delivery to the
    /// rest continues. Returns the number of subscribers that accepted the
    /// event.
    pub fn broadcast(&self, list_id: TodoListId, event: &NotificationEvent) -> usize {
        let mut registry = self.subscribers.lock();
        let Some(subscribers) = registry.get_mut(&list_id) else {
            return 0;
        };

        let mut delivered = 0;
        subscribers.retain(|_, subscriber| match subscriber.send(event.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(error) => {
                tracing::warn!(%list_id, %error, event = event.name(), "Dropping subscriber");
                false
            }
        });

        if subscribers.is_empty() {
            registry.remove(&list_id);
        }
        delivered
    }

    /// Broadcasts `event` once `list_id` has subscribers.
    ///
    /// Checks up to `max_attempts` times, sleeping `delay` after each check
    /// that found nobody, then gives up. Covers the window where a background
    /// task finishes before the client's connection is re-established.
    pub async fn broadcast_with_retry(
        &self,
        list_id: TodoListId,
        event: NotificationEvent,
        max_attempts: u32,
        delay: Duration,
    ) -> BroadcastOutcome {
        for attempt in 1..=max_attempts {
            let connections = self.subscriber_count(list_id);
            tracing::debug!(%list_id, attempt, connections, "Notification attempt");

            if connections > 0 {
                let recipients = self.broadcast(list_id, &event);
                return BroadcastOutcome::Delivered {
                    attempt,
                    recipients,
                };
            }

            tokio::time::sleep(delay).await;
        }

        tracing::warn!(
            %list_id,
            attempts = max_attempts,
            event = event.name(),
            "No subscribers, event dropped"
        );
        BroadcastOutcome::GaveUp {
            attempts: max_attempts,
        }
    }

    /// [`broadcast_with_retry`](Self::broadcast_with_retry) driven by a
    /// [`RetryPolicy`].
    pub async fn broadcast_with_policy(
        &self,
        list_id: TodoListId,
        event: NotificationEvent,
        policy: RetryPolicy,
    ) -> BroadcastOutcome {
        self.broadcast_with_retry(list_id, event, policy.max_attempts, policy.delay)
            .await
    }
}
