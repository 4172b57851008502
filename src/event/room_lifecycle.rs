use std::sync::Arc;
use tracing::debug;

use super::{bus::EventBus, room_handler::RoomEventHandler, room_subscription::RoomSubscription};

/// Owns the channel-plus-subscription pairing for rooms. Registering a room's
/// channel and spawning its subscription happen as one step so no event can
/// be published before a consumer exists.
pub struct RoomLifecycle {
    event_bus: Arc<EventBus>,
    handler: Arc<dyn RoomEventHandler>,
}

impl RoomLifecycle {
    pub fn new(event_bus: Arc<EventBus>, handler: Arc<dyn RoomEventHandler>) -> Self {
        Self { event_bus, handler }
    }

    /// Makes sure the room has a live channel and a subscription draining it.
    /// The first caller for a given key wins the registration and spawns the
    /// subscription task; later callers find the channel already present.
    pub async fn ensure_room(&self, room_key: &str) {
        if let Some(receiver) = self.event_bus.register_room(room_key).await {
            RoomSubscription::new(room_key.to_string(), receiver, Arc::clone(&self.handler))
                .start();
        } else {
            debug!(room_key = %room_key, "Room channel already registered");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::events::RoomEvent;
    use crate::event::room_handler::{RoomEventError, RoomEventHandler};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    struct RecordingHandler {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RoomEventHandler for RecordingHandler {
        async fn handle_room_event(
            &self,
            room_key: &str,
            event: RoomEvent,
        ) -> Result<(), RoomEventError> {
            self.seen
                .lock()
                .unwrap()
                .push(format!("{}:{}", room_key, event.event_type()));
            Ok(())
        }

        fn handler_name(&self) -> &'static str {
            "RecordingHandler"
        }
    }

    #[tokio::test]
    async fn test_ensure_room_spawns_consumer_for_emitted_events() {
        let bus = Arc::new(EventBus::new());
        let handler = Arc::new(RecordingHandler {
            seen: Mutex::new(Vec::new()),
        });
        let lifecycle = RoomLifecycle::new(Arc::clone(&bus), handler.clone());

        lifecycle.ensure_room("ROOM1").await;
        bus.emit_to_room(
            "ROOM1",
            RoomEvent::ChatSubmitted {
                display_name: "alice".to_string(),
                message: "hi".to_string(),
            },
        )
        .await;

        tokio::time::sleep(Duration::from_millis(20)).await;

        let seen = handler.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), ["ROOM1:chat_submitted"]); // one consumer saw it
    }

    #[tokio::test]
    async fn test_ensure_room_twice_keeps_single_subscription() {
        let bus = Arc::new(EventBus::new());
        let handler = Arc::new(RecordingHandler {
            seen: Mutex::new(Vec::new()),
        });
        let lifecycle = RoomLifecycle::new(Arc::clone(&bus), handler.clone());

        lifecycle.ensure_room("ROOM1").await;
        lifecycle.ensure_room("ROOM1").await;
        bus.emit_to_room(
            "ROOM1",
            RoomEvent::RestartRequested,
        )
        .await;

        tokio::time::sleep(Duration::from_millis(20)).await;

        let seen = handler.seen.lock().unwrap();
        assert_eq!(seen.len(), 1); // event handled once, not once per ensure call
    }

    #[tokio::test]
    async fn test_subscription_ends_when_room_removed() {
        let bus = Arc::new(EventBus::new());
        let handler = Arc::new(RecordingHandler {
            seen: Mutex::new(Vec::new()),
        });
        let lifecycle = RoomLifecycle::new(Arc::clone(&bus), handler.clone());

        lifecycle.ensure_room("ROOM1").await;
        bus.remove_room("ROOM1").await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        // Channel is gone, emits are dropped without a consumer.
        bus.emit_to_room(
            "ROOM1",
            RoomEvent::RestartRequested,
        )
        .await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(handler.seen.lock().unwrap().is_empty());
    }
}
