use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    event::RoomEventError,
    room::{repository::JoinRoomOutcome, RoomService},
    websockets::{connection_manager::ConnectionManager, messages::WebSocketMessage},
};

use super::shared::MessageBroadcaster;

pub struct RoomEventHandlers {
    room_service: Arc<RoomService>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl RoomEventHandlers {
    pub fn new(
        room_service: Arc<RoomService>,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Self {
        Self {
            room_service,
            connection_manager,
        }
    }

    /// A connection asked to join. On success everyone in the room, the new
    /// member included, gets the member list, the host, and the join
    /// announcement, in that order.
    pub async fn handle_join_requested(
        &self,
        room_key: &str,
        connection_id: &str,
        display_name: &str,
    ) -> Result<(), RoomEventError> {
        debug!(room_key = %room_key, display_name = %display_name, "Handling join request");

        let outcome = self
            .room_service
            .join_room(room_key, connection_id, display_name)
            .await
            .map_err(|e| RoomEventError::HandlerError(format!("Failed to join room: {}", e)))?;

        let room = match outcome {
            JoinRoomOutcome::Joined(room) => room,
            JoinRoomOutcome::AlreadyMember => {
                debug!(
                    room_key = %room_key,
                    connection_id = %connection_id,
                    "Duplicate join, nothing to announce"
                );
                return Ok(());
            }
        };

        MessageBroadcaster::broadcast_to_room(
            &self.connection_manager,
            room_key,
            &WebSocketMessage::update_users(room.members.clone()),
        )
        .await?;

        MessageBroadcaster::broadcast_to_room(
            &self.connection_manager,
            room_key,
            &WebSocketMessage::update_host(room.host_id.clone()),
        )
        .await?;

        MessageBroadcaster::broadcast_to_room(
            &self.connection_manager,
            room_key,
            &WebSocketMessage::message(format!("{} joined the room.", display_name)),
        )
        .await?;

        info!(
            room_key = %room_key,
            display_name = %display_name,
            member_count = room.member_count(),
            "Join announced to room"
        );

        Ok(())
    }
}
