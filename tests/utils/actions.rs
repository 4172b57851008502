use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

use liarsgame::{
    event::RoomEvent,
    room::models::{RoomModel, Stage},
    websockets::{ConnectionManager, MessageHandler, MessageType, WebSocketMessage},
};

use super::setup::{conn_id, TestSetup};

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Send a WebSocket frame through the full receive path and wait for
    /// processing.
    pub async fn send_frame(&self, connection_id: &str, message: WebSocketMessage) {
        let message_json = serde_json::to_string(&message).unwrap();
        self.input_handler
            .handle_message(connection_id, message_json)
            .await;
        sleep(Duration::from_millis(10)).await;
    }

    /// Send a raw string as if it arrived on the socket.
    pub async fn send_raw(&self, connection_id: &str, raw: &str) {
        self.input_handler
            .handle_message(connection_id, raw.to_string())
            .await;
        sleep(Duration::from_millis(10)).await;
    }

    /// Emit a room event directly and wait for processing.
    pub async fn emit_event(&self, event: RoomEvent) {
        self.event_bus.emit_to_room(&self.room_key, event).await;
        sleep(Duration::from_millis(10)).await;
    }

    /// Clear all recorded messages for all connections.
    pub async fn clear_messages(&self) {
        self.mock_conn_manager.clear_messages().await;
    }

    /// Register a connection with the manager and join it to the room.
    pub async fn connect_and_join(&self, display_name: &str) {
        let (sender, _receiver) = mpsc::unbounded_channel();
        self.mock_conn_manager
            .add_connection(conn_id(display_name), sender)
            .await;
        self.send_join(display_name).await;
    }

    pub async fn send_join(&self, display_name: &str) {
        let message = WebSocketMessage::new(
            MessageType::JoinRoom,
            json!({
                "room_key": self.room_key,
                "display_name": display_name,
            }),
        );
        self.send_frame(&conn_id(display_name), message).await;
    }

    pub async fn send_start(&self, display_name: &str) {
        let message = WebSocketMessage::new(
            MessageType::StartGame,
            json!({ "room_key": self.room_key }),
        );
        self.send_frame(&conn_id(display_name), message).await;
    }

    pub async fn send_chat(&self, display_name: &str, text: &str) {
        let message = WebSocketMessage::new(
            MessageType::ChatMessage,
            json!({
                "room_key": self.room_key,
                "display_name": display_name,
                "message": text,
            }),
        );
        self.send_frame(&conn_id(display_name), message).await;
    }

    pub async fn send_vote(&self, voter: &str, target: &str) {
        let message = WebSocketMessage::new(
            MessageType::Vote,
            json!({
                "room_key": self.room_key,
                "voter": voter,
                "target": target,
            }),
        );
        self.send_frame(&conn_id(voter), message).await;
    }

    pub async fn send_restart(&self, display_name: &str) {
        let message = WebSocketMessage::new(
            MessageType::RestartGame,
            json!({ "room_key": self.room_key }),
        );
        self.send_frame(&conn_id(display_name), message).await;
    }

    pub async fn send_leave(&self, display_name: &str) {
        let message = WebSocketMessage::new(
            MessageType::LeaveRoom,
            json!({ "room_key": self.room_key }),
        );
        self.send_frame(&conn_id(display_name), message).await;
    }

    /// Current room state, or None once the room is gone.
    pub async fn room(&self) -> Option<RoomModel> {
        self.room_service
            .get_room(&self.room_key)
            .await
            .expect("repository lookup failed")
    }

    /// Sequence number of the current round.
    pub async fn round_seq(&self) -> u64 {
        self.room().await.expect("room should exist").round.seq
    }

    /// Display name of the current odd one out, if one is assigned and
    /// still a member.
    pub async fn odd_one_out_name(&self) -> Option<String> {
        let room = self.room().await?;
        let connection_id = room.round.odd_one_out.clone()?;
        room.member_name(&connection_id).map(|s| s.to_string())
    }

    /// Drive synthetic clock beats until the room reaches the voting stage.
    pub async fn advance_clock_to_voting(&self) {
        let seq = self.round_seq().await;
        for _ in 0..200 {
            self.emit_event(RoomEvent::TurnClockTick { seq }).await;
            if let Some(room) = self.room().await {
                if room.stage == Stage::Voting {
                    return;
                }
            }
        }
        panic!("room never reached the voting stage");
    }
}
