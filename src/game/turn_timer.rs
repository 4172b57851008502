use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::interval;
use tracing::{debug, info};

use crate::event::{EventBus, RoomEvent};

/// Configuration for the per-turn explanation clock
#[derive(Debug, Clone)]
pub struct TurnTimerConfig {
    /// Seconds each speaker starts their turn with
    pub countdown_init: u32,
    /// How often the clock beats
    pub tick_interval: Duration,
}

impl Default for TurnTimerConfig {
    fn default() -> Self {
        Self {
            countdown_init: 15,
            tick_interval: Duration::from_secs(1),
        }
    }
}

/// Handle to a running turn clock. Stopping it (or dropping it, which closes
/// the cancel channel) ends the task; beats already emitted stay in the
/// room's channel and are discarded downstream by the sequence guard.
pub struct TurnTimerHandle {
    seq: u64,
    cancel_tx: watch::Sender<bool>,
}

impl TurnTimerHandle {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Signals the clock task to exit at its next beat boundary.
    pub fn stop(self) {
        let _ = self.cancel_tx.send(true);
    }
}

/// Spawns the clock task for one explanation phase. Every beat is an event
/// through the room's channel, so beats queue behind commands and never touch
/// room state concurrently with them.
pub fn spawn_turn_clock(
    room_key: String,
    seq: u64,
    tick_interval: Duration,
    event_bus: Arc<EventBus>,
) -> TurnTimerHandle {
    let (cancel_tx, mut cancel_rx) = watch::channel(false);

    info!(room_key = %room_key, seq = seq, "Starting turn clock");

    tokio::spawn(async move {
        let mut ticker = interval(tick_interval);
        // The first interval tick completes immediately; the opening beat
        // should land one full interval after the round starts.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    event_bus
                        .emit_to_room(&room_key, RoomEvent::TurnClockTick { seq })
                        .await;
                }
                _ = cancel_rx.changed() => {
                    debug!(room_key = %room_key, seq = seq, "Turn clock stopped");
                    break;
                }
            }
        }
    });

    TurnTimerHandle { seq, cancel_tx }
}
