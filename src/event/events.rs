use serde::{Deserialize, Serialize};

/// Commands flowing through a room's event channel.
///
/// Everything that mutates a room travels this way, including the turn
/// clock's beats, so a room's subscription task is the only place its state
/// changes and broadcasts always go out in commit order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RoomEvent {
    /// A connection asked to join with the given display name
    JoinRequested {
        connection_id: String,
        display_name: String,
    },

    /// A member asked to start a round
    StartRequested,

    /// A member submitted a chat line during the explanation phase
    ChatSubmitted {
        display_name: String,
        message: String,
    },

    /// A member voted for a suspect. `connection_id` is kept so a rejected
    /// vote can be answered privately.
    VoteSubmitted {
        connection_id: String,
        voter: String,
        target: String,
    },

    /// A member asked to reset the room back to the lobby
    RestartRequested,

    /// A member sent an explicit leave command
    LeaveRequested { connection_id: String },

    /// The transport closed; synthesized leave for the connection's room
    ConnectionClosed { connection_id: String },

    /// One beat of the explanation clock for round `seq`
    TurnClockTick { seq: u64 },
}

impl RoomEvent {
    /// Short label for logs.
    pub fn event_type(&self) -> &'static str {
        match self {
            RoomEvent::JoinRequested { .. } => "join_requested",
            RoomEvent::StartRequested => "start_requested",
            RoomEvent::ChatSubmitted { .. } => "chat_submitted",
            RoomEvent::VoteSubmitted { .. } => "vote_submitted",
            RoomEvent::RestartRequested => "restart_requested",
            RoomEvent::LeaveRequested { .. } => "leave_requested",
            RoomEvent::ConnectionClosed { .. } => "connection_closed",
            RoomEvent::TurnClockTick { .. } => "turn_clock_tick",
        }
    }
}
