use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::round::Role;
use crate::room::models::{Member, Stage};

/// Message types for WebSocket communication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    // Client -> Server
    JoinRoom,
    StartGame,
    ChatMessage, // also echoed Server -> Client
    Vote,
    RestartGame, // also the Server -> Client restart ack
    LeaveRoom,

    // Server -> Client
    UpdateUsers,
    UpdateHost,
    Message,
    YourRole,
    UpdateTurn,
    StageChange,
    VoteResult,
    FinalResult,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub payload: serde_json::Value,
    pub meta: Option<WebSocketMessageMeta>,
}

/// Client-to-Server message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRoomPayload {
    pub room_key: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartGamePayload {
    pub room_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessagePayload {
    pub room_key: String,
    pub display_name: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotePayload {
    pub room_key: String,
    pub voter: String,
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestartGamePayload {
    pub room_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRoomPayload {
    pub room_key: String,
}

/// Server-to-Client message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUsersPayload {
    /// Members in join order; turn rotation follows this order
    pub users: Vec<Member>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateHostPayload {
    pub host_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePayload {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatBroadcastPayload {
    pub display_name: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YourRolePayload {
    pub role: Role,
    /// The round topic; absent for the odd-one-out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTurnPayload {
    pub turn_index: u32,
    pub countdown: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageChangePayload {
    pub stage: Stage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteResultPayload {
    pub target: String,
    pub votes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalResultPayload {
    pub announcement: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestartAckPayload {
    // Empty payload - the ack itself tells clients to reset their round view
}

/// Helper functions for creating messages
impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
            }),
        }
    }

    /// Create an UPDATE_USERS message
    pub fn update_users(users: Vec<Member>) -> Self {
        let payload = UpdateUsersPayload { users };
        Self::new(
            MessageType::UpdateUsers,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create an UPDATE_HOST message
    pub fn update_host(host_id: Option<String>) -> Self {
        let payload = UpdateHostPayload { host_id };
        Self::new(
            MessageType::UpdateHost,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a MESSAGE announcement
    pub fn message(text: String) -> Self {
        let payload = MessagePayload { text };
        Self::new(MessageType::Message, serde_json::to_value(payload).unwrap())
    }

    /// Create a CHAT_MESSAGE broadcast
    pub fn chat_broadcast(display_name: String, message: String) -> Self {
        let payload = ChatBroadcastPayload {
            display_name,
            message,
        };
        Self::new(
            MessageType::ChatMessage,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a private YOUR_ROLE message
    pub fn your_role(role: Role, topic: Option<String>) -> Self {
        let payload = YourRolePayload { role, topic };
        Self::new(
            MessageType::YourRole,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create an UPDATE_TURN message
    pub fn update_turn(turn_index: u32, countdown: u32) -> Self {
        let payload = UpdateTurnPayload {
            turn_index,
            countdown,
        };
        Self::new(
            MessageType::UpdateTurn,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a STAGE_CHANGE message
    pub fn stage_change(stage: Stage) -> Self {
        let payload = StageChangePayload { stage };
        Self::new(
            MessageType::StageChange,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a VOTE_RESULT message
    pub fn vote_result(target: String, votes: u32) -> Self {
        let payload = VoteResultPayload { target, votes };
        Self::new(
            MessageType::VoteResult,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a FINAL_RESULT message
    pub fn final_result(announcement: String) -> Self {
        let payload = FinalResultPayload { announcement };
        Self::new(
            MessageType::FinalResult,
            serde_json::to_value(payload).unwrap(),
        )
    }

    /// Create a RESTART_GAME ack
    pub fn restart_ack() -> Self {
        let payload = RestartAckPayload {};
        Self::new(
            MessageType::RestartGame,
            serde_json::to_value(payload).unwrap(),
        )
    }
}
