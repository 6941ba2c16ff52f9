//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`AppEvent`]s. It is
//! shared as `Arc<EventBus>` between the REST client (session expiry) and
//! the tree editor (load/save/error notifications); any number of UI
//! subscribers can listen independently.

use chrono::{DateTime, Utc};
use rootline_core::types::EntityId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// Well-known event type names.
pub mod event_types {
    /// A 401 cleared the session; the UI must redirect to authentication.
    pub const SESSION_EXPIRED: &str = "session.expired";
    /// The tree was (re)loaded from the backend.
    pub const TREE_LOADED: &str = "tree.loaded";
    /// A pending-position batch flushed successfully.
    pub const TREE_POSITIONS_SAVED: &str = "tree.positions_saved";
    /// A tree operation failed; `message` carries the user-facing text.
    pub const TREE_ERROR: &str = "tree.error";
    pub const NODE_CREATED: &str = "node.created";
    pub const NODE_UPDATED: &str = "node.updated";
    pub const NODE_DELETED: &str = "node.deleted";
    pub const EDGE_CREATED: &str = "edge.created";
    pub const EDGE_DELETED: &str = "edge.deleted";
}

/// A notification produced somewhere in the engine and consumed by the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppEvent {
    /// Dot-separated event name, e.g. `"edge.created"`.
    pub event_type: String,

    /// Optional entity kind the event refers to (e.g. `"node"`).
    pub entity_type: Option<String>,

    /// Optional id of the entity the event refers to.
    pub entity_id: Option<EntityId>,

    /// Optional human-readable message (error text, toast body).
    pub message: Option<String>,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl AppEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            entity_type: None,
            entity_id: None,
            message: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach the entity this event refers to.
    pub fn with_entity(mut self, entity_type: impl Into<String>, id: impl Into<EntityId>) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(id.into());
        self
    }

    /// Attach a human-readable message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// When the buffer is full the oldest un-consumed events are dropped and
/// slow receivers observe a `RecvError::Lagged`; events are transient UI
/// notifications, so losing old ones under pressure is acceptable.
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With zero subscribers the event is silently dropped.
    pub fn publish(&self, event: AppEvent) {
        // SendError only means there are no receivers right now.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            AppEvent::new(event_types::EDGE_CREATED)
                .with_entity("edge", "a-b")
                .with_message("Relation created"),
        );

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, "edge.created");
        assert_eq!(event.entity_id.as_deref(), Some("a-b"));
        assert_eq!(event.message.as_deref(), Some("Relation created"));
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_no_op() {
        let bus = EventBus::default();
        // Must not panic or error.
        bus.publish(AppEvent::new(event_types::TREE_LOADED));
    }

    #[tokio::test]
    async fn each_subscriber_gets_every_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(AppEvent::new(event_types::NODE_DELETED));

        assert_eq!(rx1.recv().await.unwrap().event_type, "node.deleted");
        assert_eq!(rx2.recv().await.unwrap().event_type, "node.deleted");
    }
}
