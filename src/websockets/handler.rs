use async_trait::async_trait;
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::event::{EventBus, RoomEvent, RoomLifecycle};
use crate::shared::AppState;
use crate::websockets::connection_manager::ConnectionManager;
use crate::websockets::messages::{
    ChatMessagePayload, JoinRoomPayload, LeaveRoomPayload, MessageType, RestartGamePayload,
    StartGamePayload, VotePayload, WebSocketMessage,
};

use super::socket::{Connection, MessageHandler};

/// Message handler for receiving WebSocket messages from the client
///
/// Every command names its room in the payload, so routing is a straight
/// emit to that room's channel. Room-level rules (membership, stage) are
/// enforced by the event handlers, not here.
pub struct WebsocketReceiveHandler {
    event_bus: Arc<EventBus>,
    connection_manager: Arc<dyn ConnectionManager>,
    room_lifecycle: Arc<RoomLifecycle>,
}

impl WebsocketReceiveHandler {
    pub fn new(
        event_bus: Arc<EventBus>,
        connection_manager: Arc<dyn ConnectionManager>,
        room_lifecycle: Arc<RoomLifecycle>,
    ) -> Self {
        Self {
            event_bus,
            connection_manager,
            room_lifecycle,
        }
    }
}

/// Decode a command payload into its typed form. Bad shapes are logged and
/// dropped without an error reply, like any other ignorable command.
fn decode_payload<T: DeserializeOwned>(
    connection_id: &str,
    payload: serde_json::Value,
) -> Option<T> {
    match serde_json::from_value(payload) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!(
                connection_id = %connection_id,
                error = %e,
                "Malformed command payload"
            );
            None
        }
    }
}

#[async_trait]
impl MessageHandler for WebsocketReceiveHandler {
    async fn handle_message(&self, connection_id: &str, message: String) {
        debug!(
            connection_id = %connection_id,
            message = %message,
            "Received message"
        );

        // Parse message and emit appropriate event
        let frame = match serde_json::from_str::<WebSocketMessage>(&message) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(
                    connection_id = %connection_id,
                    error = %e,
                    "Failed to parse WebSocket message"
                );
                return;
            }
        };

        let WebSocketMessage {
            message_type,
            payload,
            ..
        } = frame;

        match message_type {
            MessageType::JoinRoom => {
                if let Some(join) = decode_payload::<JoinRoomPayload>(connection_id, payload) {
                    // One room per connection. A join for a second room is
                    // refused; rejoining the bound room is harmless.
                    if !self
                        .connection_manager
                        .bind_room(connection_id, &join.room_key)
                        .await
                    {
                        warn!(
                            connection_id = %connection_id,
                            room_key = %join.room_key,
                            "Join refused, connection is bound to another room"
                        );
                        return;
                    }

                    self.room_lifecycle.ensure_room(&join.room_key).await;
                    self.event_bus
                        .emit_to_room(
                            &join.room_key,
                            RoomEvent::JoinRequested {
                                connection_id: connection_id.to_string(),
                                display_name: join.display_name,
                            },
                        )
                        .await;
                }
            }
            MessageType::StartGame => {
                if let Some(start) = decode_payload::<StartGamePayload>(connection_id, payload) {
                    self.event_bus
                        .emit_to_room(&start.room_key, RoomEvent::StartRequested)
                        .await;
                }
            }
            MessageType::ChatMessage => {
                if let Some(chat) = decode_payload::<ChatMessagePayload>(connection_id, payload) {
                    self.event_bus
                        .emit_to_room(
                            &chat.room_key,
                            RoomEvent::ChatSubmitted {
                                display_name: chat.display_name,
                                message: chat.message,
                            },
                        )
                        .await;
                }
            }
            MessageType::Vote => {
                if let Some(vote) = decode_payload::<VotePayload>(connection_id, payload) {
                    self.event_bus
                        .emit_to_room(
                            &vote.room_key,
                            RoomEvent::VoteSubmitted {
                                connection_id: connection_id.to_string(),
                                voter: vote.voter,
                                target: vote.target,
                            },
                        )
                        .await;
                }
            }
            MessageType::RestartGame => {
                if let Some(restart) =
                    decode_payload::<RestartGamePayload>(connection_id, payload)
                {
                    self.event_bus
                        .emit_to_room(&restart.room_key, RoomEvent::RestartRequested)
                        .await;
                }
            }
            MessageType::LeaveRoom => {
                if let Some(leave) = decode_payload::<LeaveRoomPayload>(connection_id, payload) {
                    self.event_bus
                        .emit_to_room(
                            &leave.room_key,
                            RoomEvent::LeaveRequested {
                                connection_id: connection_id.to_string(),
                            },
                        )
                        .await;
                }
            }
            _ => {
                debug!(
                    message_type = ?message_type,
                    "Unhandled message type"
                );
            }
        }
    }
}

/// WebSocket endpoint. Connections arrive anonymous and pick up identity and
/// room membership later through JOIN_ROOM commands.
/// GET /ws
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
) -> Response {
    let connection_id = Uuid::new_v4().to_string();
    info!(
        connection_id = %connection_id,
        "WebSocket connection requested"
    );

    ws.on_upgrade(move |socket| handle_websocket_connection(socket, connection_id, app_state))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(
    socket: axum::extract::ws::WebSocket,
    connection_id: String,
    app_state: AppState,
) {
    info!(
        connection_id = %connection_id,
        "WebSocket connection established"
    );

    // Create the outbound channel (app -> client)
    let (outbound_sender, outbound_receiver) = mpsc::unbounded_channel::<String>();

    app_state
        .connection_manager
        .add_connection(connection_id.clone(), outbound_sender)
        .await;

    // Wrap the axum WebSocket in our simple interface
    let socket_wrapper = Box::new(socket);

    let message_handler = Arc::new(WebsocketReceiveHandler::new(
        Arc::clone(&app_state.event_bus),
        Arc::clone(&app_state.connection_manager),
        Arc::clone(&app_state.room_lifecycle),
    ));

    // Create and run the connection
    let connection = Connection::new(
        connection_id.clone(),
        socket_wrapper,
        outbound_receiver,
        message_handler,
    );

    // Run the connection until disconnect
    match connection.run().await {
        Ok(()) => {
            info!(
                connection_id = %connection_id,
                "WebSocket connection closed cleanly"
            );
        }
        Err(e) => {
            warn!(
                connection_id = %connection_id,
                error = ?e,
                "WebSocket connection error"
            );
        }
    }

    // Cleanup: note the bound room before the binding is dropped, then let
    // that room's event funnel run the departure.
    let bound_room = app_state.connection_manager.room_of(&connection_id).await;

    app_state
        .connection_manager
        .remove_connection(&connection_id)
        .await;

    if let Some(room_key) = bound_room {
        app_state
            .event_bus
            .emit_to_room(
                &room_key,
                RoomEvent::ConnectionClosed {
                    connection_id: connection_id.clone(),
                },
            )
            .await;

        info!(
            connection_id = %connection_id,
            room_key = %room_key,
            "WebSocket disconnect event emitted"
        );
    }
}
