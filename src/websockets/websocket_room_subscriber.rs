use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::{
    event::{EventBus, RoomEvent, RoomEventError, RoomEventHandler},
    game::GameService,
    room::RoomService,
    websockets::connection_manager::ConnectionManager,
};

use super::event_handlers::{
    ChatEventHandlers, ConnectionEventHandlers, GameEventHandlers, RoomEventHandlers,
};

/// WebSocket-specific room event handler
///
/// Runs inside each room's subscription task and fans events out to the
/// specialized handlers:
/// - RoomEventHandlers: join requests
/// - ChatEventHandlers: chat lines
/// - GameEventHandlers: round start, votes, restarts, clock beats
/// - ConnectionEventHandlers: explicit leaves and dropped connections
pub struct WebSocketRoomSubscriber {
    room_handlers: RoomEventHandlers,
    chat_handlers: ChatEventHandlers,
    game_handlers: GameEventHandlers,
    connection_handlers: ConnectionEventHandlers,
}

#[async_trait]
impl RoomEventHandler for WebSocketRoomSubscriber {
    async fn handle_room_event(
        &self,
        room_key: &str,
        event: RoomEvent,
    ) -> Result<(), RoomEventError> {
        debug!(
            room_key = %room_key,
            event = ?event,
            "Handling room event for WebSocket connections"
        );

        match event {
            RoomEvent::JoinRequested {
                connection_id,
                display_name,
            } => {
                self.room_handlers
                    .handle_join_requested(room_key, &connection_id, &display_name)
                    .await
            }
            RoomEvent::StartRequested => {
                self.game_handlers.handle_start_requested(room_key).await
            }
            RoomEvent::ChatSubmitted {
                display_name,
                message,
            } => {
                self.chat_handlers
                    .handle_chat_submitted(room_key, &display_name, &message)
                    .await
            }
            RoomEvent::VoteSubmitted {
                connection_id,
                voter,
                target,
            } => {
                self.game_handlers
                    .handle_vote_submitted(room_key, &connection_id, &voter, &target)
                    .await
            }
            RoomEvent::RestartRequested => {
                self.game_handlers.handle_restart_requested(room_key).await
            }
            RoomEvent::LeaveRequested { connection_id } => {
                self.connection_handlers
                    .handle_departure(room_key, &connection_id)
                    .await
            }
            RoomEvent::ConnectionClosed { connection_id } => {
                self.connection_handlers
                    .handle_departure(room_key, &connection_id)
                    .await
            }
            RoomEvent::TurnClockTick { seq } => {
                self.game_handlers
                    .handle_turn_clock_tick(room_key, seq)
                    .await
            }
        }
    }

    fn handler_name(&self) -> &'static str {
        "WebSocketRoomSubscriber"
    }
}

impl WebSocketRoomSubscriber {
    pub fn new(
        room_service: Arc<RoomService>,
        game_service: Arc<GameService>,
        connection_manager: Arc<dyn ConnectionManager>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let room_handlers = RoomEventHandlers::new(
            Arc::clone(&room_service),
            Arc::clone(&connection_manager),
        );

        let chat_handlers =
            ChatEventHandlers::new(Arc::clone(&room_service), Arc::clone(&connection_manager));

        let game_handlers = GameEventHandlers::new(
            Arc::clone(&game_service),
            Arc::clone(&connection_manager),
        );

        let connection_handlers = ConnectionEventHandlers::new(
            Arc::clone(&room_service),
            Arc::clone(&game_service),
            Arc::clone(&connection_manager),
            Arc::clone(&event_bus),
        );

        Self {
            room_handlers,
            chat_handlers,
            game_handlers,
            connection_handlers,
        }
    }
}
