use async_trait::async_trait;
use thiserror::Error;

use super::events::RoomEvent;

/// Errors surfaced by room event handlers. A missing room is never one of
/// them: commands against rooms that no longer exist are dropped silently.
#[derive(Debug, Error)]
pub enum RoomEventError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Handler error: {0}")]
    HandlerError(String),
}

/// Consumer side of a room's event channel.
///
/// An implementation receives every event for its room, one at a time and in
/// emit order, and is the only code that mutates the room. Failures are
/// logged by the subscription and never crash the room.
#[async_trait]
pub trait RoomEventHandler: Send + Sync {
    async fn handle_room_event(
        &self,
        room_key: &str,
        event: RoomEvent,
    ) -> Result<(), RoomEventError>;

    /// Human-readable name for logging.
    fn handler_name(&self) -> &'static str;
}
