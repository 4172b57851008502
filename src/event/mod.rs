// Event-driven architecture components
//
// This module provides the per-room event channels and the subscription
// tasks that serialize each room's command handling.

// Public API - what other modules can use
pub use bus::EventBus;
pub use events::RoomEvent;
pub use room_handler::{RoomEventError, RoomEventHandler};
pub use room_lifecycle::RoomLifecycle;
pub use room_subscription::RoomSubscription;

// Internal modules
mod bus;
mod events;
mod room_handler;
mod room_lifecycle;
mod room_subscription;
