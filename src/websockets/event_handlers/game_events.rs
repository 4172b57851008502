use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    event::RoomEventError,
    game::GameService,
    room::models::{ClockTick, Stage, VoteOutcome},
    room::repository::{RestartRoundOutcome, RoundStartOutcome},
    websockets::{connection_manager::ConnectionManager, messages::WebSocketMessage},
};

use super::shared::MessageBroadcaster;

pub struct GameEventHandlers {
    game_service: Arc<GameService>,
    connection_manager: Arc<dyn ConnectionManager>,
}

impl GameEventHandlers {
    pub fn new(
        game_service: Arc<GameService>,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Self {
        Self {
            game_service,
            connection_manager,
        }
    }

    /// Starts a round. Each member privately learns their role (citizens get
    /// the topic), then the room sees the stage change and the start
    /// announcement. The first UPDATE_TURN arrives with the clock's first
    /// beat.
    pub async fn handle_start_requested(&self, room_key: &str) -> Result<(), RoomEventError> {
        info!(room_key = %room_key, "Handling start request");

        let outcome = self
            .game_service
            .start_round(room_key)
            .await
            .map_err(|e| RoomEventError::HandlerError(format!("Failed to start round: {}", e)))?;

        let assignments = match outcome {
            RoundStartOutcome::Started { assignments, .. } => assignments,
            RoundStartOutcome::RoomNotFound => {
                debug!(room_key = %room_key, "Start for a room that no longer exists");
                return Ok(());
            }
        };

        for assignment in &assignments {
            MessageBroadcaster::send_to_connection(
                &self.connection_manager,
                &assignment.connection_id,
                &WebSocketMessage::your_role(assignment.role, assignment.topic.clone()),
            )
            .await?;
        }

        MessageBroadcaster::broadcast_to_room(
            &self.connection_manager,
            room_key,
            &WebSocketMessage::stage_change(Stage::Explaining),
        )
        .await?;

        MessageBroadcaster::broadcast_to_room(
            &self.connection_manager,
            room_key,
            &WebSocketMessage::message("The round has started!".to_string()),
        )
        .await?;

        info!(
            room_key = %room_key,
            member_count = assignments.len(),
            "Round start announced"
        );

        Ok(())
    }

    /// Applies one vote. Accepted votes broadcast the target's running count;
    /// the completing vote additionally broadcasts the final result and the
    /// move to the result stage. A duplicate voter gets a private advisory.
    pub async fn handle_vote_submitted(
        &self,
        room_key: &str,
        connection_id: &str,
        voter: &str,
        target: &str,
    ) -> Result<(), RoomEventError> {
        debug!(room_key = %room_key, voter = %voter, target = %target, "Handling vote");

        let outcome = self
            .game_service
            .record_vote(room_key, voter, target)
            .await
            .map_err(|e| RoomEventError::HandlerError(format!("Failed to record vote: {}", e)))?;

        let outcome = match outcome {
            Some(outcome) => outcome,
            None => {
                debug!(room_key = %room_key, "Vote for a room that no longer exists");
                return Ok(());
            }
        };

        match outcome {
            VoteOutcome::Recorded { target, votes } => {
                MessageBroadcaster::broadcast_to_room(
                    &self.connection_manager,
                    room_key,
                    &WebSocketMessage::vote_result(target, votes),
                )
                .await?;
            }
            VoteOutcome::Completed {
                target,
                votes,
                result,
            } => {
                MessageBroadcaster::broadcast_to_room(
                    &self.connection_manager,
                    room_key,
                    &WebSocketMessage::vote_result(target, votes),
                )
                .await?;

                MessageBroadcaster::broadcast_to_room(
                    &self.connection_manager,
                    room_key,
                    &WebSocketMessage::final_result(result.announcement()),
                )
                .await?;

                MessageBroadcaster::broadcast_to_room(
                    &self.connection_manager,
                    room_key,
                    &WebSocketMessage::stage_change(Stage::Result),
                )
                .await?;

                info!(room_key = %room_key, result = ?result, "Round resolved");
            }
            VoteOutcome::AlreadyVoted => {
                MessageBroadcaster::send_to_connection(
                    &self.connection_manager,
                    connection_id,
                    &WebSocketMessage::message("You have already voted.".to_string()),
                )
                .await?;
            }
            VoteOutcome::NotAMember => {
                debug!(room_key = %room_key, voter = %voter, "Vote from a non-member dropped");
            }
            VoteOutcome::WrongStage => {
                debug!(room_key = %room_key, voter = %voter, "Vote outside the voting stage dropped");
            }
        }

        Ok(())
    }

    /// Returns the room to the lobby. The ack alone resets client round
    /// views; no stage change frame is sent.
    pub async fn handle_restart_requested(&self, room_key: &str) -> Result<(), RoomEventError> {
        info!(room_key = %room_key, "Handling restart request");

        let outcome = self
            .game_service
            .reset_round(room_key)
            .await
            .map_err(|e| RoomEventError::HandlerError(format!("Failed to reset round: {}", e)))?;

        match outcome {
            RestartRoundOutcome::Reset => {
                MessageBroadcaster::broadcast_to_room(
                    &self.connection_manager,
                    room_key,
                    &WebSocketMessage::restart_ack(),
                )
                .await?;

                MessageBroadcaster::broadcast_to_room(
                    &self.connection_manager,
                    room_key,
                    &WebSocketMessage::message(
                        "The game has been reset. Back to the lobby.".to_string(),
                    ),
                )
                .await?;
            }
            RestartRoundOutcome::RefusedExplaining => {
                warn!(room_key = %room_key, "Restart ignored while a turn clock is live");
            }
            RestartRoundOutcome::RoomNotFound => {
                debug!(room_key = %room_key, "Restart for a room that no longer exists");
            }
        }

        Ok(())
    }

    /// One clock beat. The observed pair goes out before any further
    /// progress, and the beat that ends the phase is followed by the move to
    /// voting.
    pub async fn handle_turn_clock_tick(
        &self,
        room_key: &str,
        seq: u64,
    ) -> Result<(), RoomEventError> {
        let tick = self
            .game_service
            .advance_clock(room_key, seq)
            .await
            .map_err(|e| RoomEventError::HandlerError(format!("Failed to advance clock: {}", e)))?;

        match tick {
            ClockTick::Tick {
                turn_index,
                countdown,
            } => {
                MessageBroadcaster::broadcast_to_room(
                    &self.connection_manager,
                    room_key,
                    &WebSocketMessage::update_turn(turn_index, countdown),
                )
                .await?;
            }
            ClockTick::PhaseComplete {
                turn_index,
                countdown,
            } => {
                MessageBroadcaster::broadcast_to_room(
                    &self.connection_manager,
                    room_key,
                    &WebSocketMessage::update_turn(turn_index, countdown),
                )
                .await?;

                MessageBroadcaster::broadcast_to_room(
                    &self.connection_manager,
                    room_key,
                    &WebSocketMessage::stage_change(Stage::Voting),
                )
                .await?;

                info!(room_key = %room_key, "Explanation phase over, voting open");
            }
            ClockTick::Stale => {
                debug!(room_key = %room_key, seq = seq, "Stale clock beat dropped");
            }
        }

        Ok(())
    }
}
