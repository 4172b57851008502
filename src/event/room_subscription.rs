use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{events::RoomEvent, room_handler::RoomEventHandler};

/// Drives one room's event channel: receives events in order and hands each
/// to the handler before taking the next. The task ends when the channel is
/// removed from the bus.
pub struct RoomSubscription {
    room_key: String,
    receiver: broadcast::Receiver<RoomEvent>,
    handler: Arc<dyn RoomEventHandler>,
}

impl RoomSubscription {
    pub fn new(
        room_key: String,
        receiver: broadcast::Receiver<RoomEvent>,
        handler: Arc<dyn RoomEventHandler>,
    ) -> Self {
        Self {
            room_key,
            receiver,
            handler,
        }
    }

    /// Spawns the background task that routes the room's events.
    pub fn start(self) -> JoinHandle<()> {
        let Self {
            room_key,
            mut receiver,
            handler,
        } = self;
        let handler_name = handler.handler_name();

        info!(
            room_key = %room_key,
            handler = handler_name,
            "Starting room subscription"
        );

        tokio::spawn(async move {
            loop {
                let event = match receiver.recv().await {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(
                            room_key = %room_key,
                            missed = missed,
                            "Room subscription lagged, events were dropped"
                        );
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };

                debug!(
                    room_key = %room_key,
                    event = event.event_type(),
                    "Handling room event"
                );

                if let Err(e) = handler.handle_room_event(&room_key, event).await {
                    warn!(
                        room_key = %room_key,
                        handler = handler_name,
                        error = %e,
                        "Room event handler failed"
                    );
                }
            }

            info!(room_key = %room_key, "Room subscription ended");
        })
    }
}
