use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use super::events::RoomEvent;

const ROOM_CHANNEL_CAPACITY: usize = 100;

/// Per-room event channels. A channel exists exactly while its room does:
/// registered when the room is created on first join, removed when the room
/// empties. Emitting to an unknown room drops the event, which is how
/// commands against nonexistent rooms become silent no-ops.
#[derive(Debug, Clone)]
pub struct EventBus {
    /// room_key -> sender
    room_channels: Arc<RwLock<HashMap<String, broadcast::Sender<RoomEvent>>>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            room_channels: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Creates the channel for a room and returns its receiver. `None` when
    /// the room is already registered, so exactly one caller ends up owning
    /// the subscription.
    pub async fn register_room(&self, room_key: &str) -> Option<broadcast::Receiver<RoomEvent>> {
        let mut room_channels = self.room_channels.write().await;

        if room_channels.contains_key(room_key) {
            return None;
        }

        let (sender, receiver) = broadcast::channel(ROOM_CHANNEL_CAPACITY);
        room_channels.insert(room_key.to_string(), sender);
        debug!(room_key = %room_key, "Room channel registered");
        Some(receiver)
    }

    /// Emits an event to a room's channel. Events for unregistered rooms are
    /// dropped.
    pub async fn emit_to_room(&self, room_key: &str, event: RoomEvent) {
        let room_channels = self.room_channels.read().await;

        match room_channels.get(room_key) {
            Some(sender) => {
                if sender.send(event).is_err() {
                    debug!(room_key = %room_key, "Room event emitted with no receivers");
                }
            }
            None => {
                debug!(
                    room_key = %room_key,
                    event = event.event_type(),
                    "Dropping event for unknown room"
                );
            }
        }
    }

    /// Drops a room's channel. The subscription task drains whatever is
    /// still queued and then ends on the closed channel.
    pub async fn remove_room(&self, room_key: &str) {
        let mut room_channels = self.room_channels.write().await;
        if room_channels.remove(room_key).is_some() {
            debug!(room_key = %room_key, "Room channel removed");
        }
    }
}
