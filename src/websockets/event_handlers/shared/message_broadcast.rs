use crate::{
    event::RoomEventError,
    websockets::{connection_manager::ConnectionManager, messages::WebSocketMessage},
};
use std::sync::Arc;

pub struct MessageBroadcaster;

impl MessageBroadcaster {
    /// Serializes once and enqueues the frame for every connection in the
    /// room.
    pub async fn broadcast_to_room(
        connection_manager: &Arc<dyn ConnectionManager>,
        room_key: &str,
        message: &WebSocketMessage,
    ) -> Result<(), RoomEventError> {
        let message_json = serde_json::to_string(message).map_err(|e| {
            RoomEventError::ConnectionError(format!("Failed to serialize message: {}", e))
        })?;

        connection_manager
            .broadcast_to_room(room_key, &message_json)
            .await;

        Ok(())
    }

    /// Sends a private frame to a single connection.
    pub async fn send_to_connection(
        connection_manager: &Arc<dyn ConnectionManager>,
        connection_id: &str,
        message: &WebSocketMessage,
    ) -> Result<(), RoomEventError> {
        let message_json = serde_json::to_string(message).map_err(|e| {
            RoomEventError::ConnectionError(format!("Failed to serialize message: {}", e))
        })?;

        connection_manager
            .send_to_connection(connection_id, &message_json)
            .await;

        Ok(())
    }
}
