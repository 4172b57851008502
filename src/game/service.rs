use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument};

use crate::{
    event::EventBus,
    game::{
        turn_timer::{spawn_turn_clock, TurnTimerConfig, TurnTimerHandle},
        words::WordPool,
    },
    room::models::{ClockTick, VoteOutcome},
    room::repository::{RestartRoundOutcome, RoomRepository, RoundStartOutcome},
    shared::AppError,
};

/// Service for round flow: starting rounds, collecting votes, advancing the
/// explanation clock. Owns the per-room clock tasks so exactly one clock runs
/// per room at a time.
pub struct GameService {
    repository: Arc<dyn RoomRepository>,
    word_pool: WordPool,
    event_bus: Arc<EventBus>,
    timer_config: TurnTimerConfig,
    timers: Mutex<HashMap<String, TurnTimerHandle>>,
}

impl GameService {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        event_bus: Arc<EventBus>,
        timer_config: TurnTimerConfig,
    ) -> Self {
        Self {
            repository,
            word_pool: WordPool::default(),
            event_bus,
            timer_config,
            timers: Mutex::new(HashMap::new()),
        }
    }

    /// Starts a round: picks a topic, deals roles, and arms the turn clock.
    /// A round already in progress is simply replaced; its clock is stopped
    /// and the sequence guard retires any beats it already emitted.
    #[instrument(skip(self))]
    pub async fn start_round(&self, room_key: &str) -> Result<RoundStartOutcome, AppError> {
        let topic = self.word_pool.pick_topic().ok_or(AppError::Internal)?;
        debug!(room_key = %room_key, topic = %topic, "Picked round topic");

        let outcome = self
            .repository
            .begin_round(room_key, &topic, self.timer_config.countdown_init)
            .await?;

        if let RoundStartOutcome::Started { seq, assignments } = &outcome {
            info!(
                room_key = %room_key,
                seq = seq,
                member_count = assignments.len(),
                "Round started, arming turn clock"
            );

            let handle = spawn_turn_clock(
                room_key.to_string(),
                *seq,
                self.timer_config.tick_interval,
                Arc::clone(&self.event_bus),
            );
            let previous = self.timers.lock().unwrap().insert(room_key.to_string(), handle);
            if let Some(previous) = previous {
                previous.stop();
            }
        }

        Ok(outcome)
    }

    /// Records one vote. The clock is already retired by the time voting is
    /// open, so completion only flips the stage; no task cleanup happens here.
    #[instrument(skip(self))]
    pub async fn record_vote(
        &self,
        room_key: &str,
        voter: &str,
        target: &str,
    ) -> Result<Option<VoteOutcome>, AppError> {
        self.repository.record_vote(room_key, voter, target).await
    }

    /// Applies one clock beat. A beat that finishes the explanation phase
    /// also retires the clock that produced it.
    pub async fn advance_clock(&self, room_key: &str, seq: u64) -> Result<ClockTick, AppError> {
        let tick = self.repository.advance_turn_clock(room_key, seq).await?;

        if matches!(tick, ClockTick::PhaseComplete { .. }) {
            info!(room_key = %room_key, seq = seq, "Explanation phase complete, stopping turn clock");
            let mut timers = self.timers.lock().unwrap();
            // Only retire the clock that produced this beat; a newer round
            // may already own the slot.
            if timers.get(room_key).is_some_and(|h| h.seq() == seq) {
                if let Some(handle) = timers.remove(room_key) {
                    handle.stop();
                }
            }
        }

        Ok(tick)
    }

    /// Returns the room to the lobby, stopping its clock when the reset is
    /// accepted.
    #[instrument(skip(self))]
    pub async fn reset_round(&self, room_key: &str) -> Result<RestartRoundOutcome, AppError> {
        let outcome = self.repository.reset_round(room_key).await?;

        if outcome == RestartRoundOutcome::Reset {
            info!(room_key = %room_key, "Round reset to lobby");
            self.stop_turn_clock(room_key);
        }

        Ok(outcome)
    }

    /// Stops and removes the room's clock task, if one is running. Called on
    /// round completion and when the room itself goes away.
    pub fn stop_turn_clock(&self, room_key: &str) {
        let handle = self.timers.lock().unwrap().remove(room_key);
        if let Some(handle) = handle {
            handle.stop();
        }
    }
}
