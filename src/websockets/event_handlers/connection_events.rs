use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    event::{EventBus, RoomEventError},
    game::GameService,
    room::{repository::LeaveRoomOutcome, RoomService},
    websockets::{connection_manager::ConnectionManager, messages::WebSocketMessage},
};

use super::shared::MessageBroadcaster;

/// Handles departures, both explicit leave commands and closed sockets. The
/// two share one path: the connection is unbound first so the announcements
/// reach only the members who stay.
pub struct ConnectionEventHandlers {
    room_service: Arc<RoomService>,
    game_service: Arc<GameService>,
    connection_manager: Arc<dyn ConnectionManager>,
    event_bus: Arc<EventBus>,
}

impl ConnectionEventHandlers {
    pub fn new(
        room_service: Arc<RoomService>,
        game_service: Arc<GameService>,
        connection_manager: Arc<dyn ConnectionManager>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            room_service,
            game_service,
            connection_manager,
            event_bus,
        }
    }

    pub async fn handle_departure(
        &self,
        room_key: &str,
        connection_id: &str,
    ) -> Result<(), RoomEventError> {
        info!(
            room_key = %room_key,
            connection_id = %connection_id,
            "Processing departure"
        );

        self.connection_manager.unbind_room(connection_id).await;

        let outcome = self
            .room_service
            .leave_room(room_key, connection_id)
            .await
            .map_err(|e| RoomEventError::HandlerError(format!("Failed to process leave: {}", e)))?;

        match outcome {
            LeaveRoomOutcome::Left {
                room,
                departed,
                host_changed,
            } => {
                MessageBroadcaster::broadcast_to_room(
                    &self.connection_manager,
                    room_key,
                    &WebSocketMessage::message(format!(
                        "{} left the room.",
                        departed.display_name
                    )),
                )
                .await?;

                MessageBroadcaster::broadcast_to_room(
                    &self.connection_manager,
                    room_key,
                    &WebSocketMessage::update_users(room.members.clone()),
                )
                .await?;

                if host_changed {
                    MessageBroadcaster::broadcast_to_room(
                        &self.connection_manager,
                        room_key,
                        &WebSocketMessage::update_host(room.host_id.clone()),
                    )
                    .await?;
                }

                info!(
                    room_key = %room_key,
                    display_name = %departed.display_name,
                    host_changed = host_changed,
                    "Departure announced to room"
                );
            }
            LeaveRoomOutcome::RoomDeleted { departed } => {
                // Nobody is left to notify; tear the room's machinery down.
                self.game_service.stop_turn_clock(room_key);
                self.event_bus.remove_room(room_key).await;

                info!(
                    room_key = %room_key,
                    display_name = %departed.display_name,
                    "Last member left, room destroyed"
                );
            }
            LeaveRoomOutcome::NotAMember | LeaveRoomOutcome::RoomNotFound => {
                debug!(
                    room_key = %room_key,
                    connection_id = %connection_id,
                    "Departure for a room the connection is not in"
                );
            }
        }

        Ok(())
    }
}
