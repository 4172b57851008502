use std::sync::Arc;
use tracing::debug;

use crate::{
    event::RoomEventError,
    room::RoomService,
    websockets::{connection_manager::ConnectionManager, messages::WebSocketMessage},
};

use super::shared::{MessageBroadcaster, RoomQueryUtils};

pub struct ChatEventHandlers {
    room_service: Arc<RoomService>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl ChatEventHandlers {
    pub fn new(
        room_service: Arc<RoomService>,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Self {
        Self {
            room_service,
            connection_manager,
        }
    }

    /// Relays a chat line to the whole room. Chat is not turn-gated; clients
    /// surface whose turn it is, the server only observes it for the log.
    pub async fn handle_chat_submitted(
        &self,
        room_key: &str,
        display_name: &str,
        message: &str,
    ) -> Result<(), RoomEventError> {
        let room = match RoomQueryUtils::get_room_if_exists(&self.room_service, room_key).await? {
            Some(room) => room,
            None => {
                debug!(room_key = %room_key, "Chat for a room that no longer exists");
                return Ok(());
            }
        };

        let speaking_in_turn = room
            .current_speaker()
            .map(|speaker| speaker.display_name == display_name);
        debug!(
            room_key = %room_key,
            display_name = %display_name,
            speaking_in_turn = ?speaking_in_turn,
            "Relaying chat message"
        );

        MessageBroadcaster::broadcast_to_room(
            &self.connection_manager,
            room_key,
            &WebSocketMessage::chat_broadcast(display_name.to_string(), message.to_string()),
        )
        .await?;

        Ok(())
    }
}
