// Library crate for the Liar game server
// This file exposes the public API for integration tests

pub mod event;
pub mod game;
pub mod room;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use event::{EventBus, RoomEvent, RoomLifecycle, RoomSubscription};
pub use game::{GameService, TurnTimerConfig};
pub use room::{models::RoomModel, repository::RoomRepository, RoomService};
pub use shared::AppError;
pub use websockets::{
    ConnectionManager, MessageHandler, MessageType, WebSocketMessage, WebSocketRoomSubscriber,
    WebsocketReceiveHandler,
};
