use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    models::RoomModel,
    repository::{JoinRoomOutcome, LeaveRoomOutcome, RoomRepository},
};
use crate::shared::AppError;

/// Service for room membership logic
pub struct RoomService {
    repository: Arc<dyn RoomRepository>,
}

impl RoomService {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// Gets the full room model for internal use (WebSocket handlers, etc.)
    #[instrument(skip(self))]
    pub async fn get_room(&self, room_key: &str) -> Result<Option<RoomModel>, AppError> {
        debug!(room_key = %room_key, "Getting room model");
        self.repository.get_room(room_key).await
    }

    /// Joins a room, creating it on first join
    #[instrument(skip(self))]
    pub async fn join_room(
        &self,
        room_key: &str,
        connection_id: &str,
        display_name: &str,
    ) -> Result<JoinRoomOutcome, AppError> {
        info!(room_key = %room_key, display_name = %display_name, "Attempting to join room");

        let outcome = self
            .repository
            .join_room(room_key, connection_id, display_name)
            .await?;

        match &outcome {
            JoinRoomOutcome::Joined(room) => {
                info!(
                    room_key = %room_key,
                    display_name = %display_name,
                    member_count = room.member_count(),
                    "Member joined room successfully"
                );
            }
            JoinRoomOutcome::AlreadyMember => {
                debug!(
                    room_key = %room_key,
                    connection_id = %connection_id,
                    "Connection is already a member"
                );
            }
        }

        Ok(outcome)
    }

    /// Leaves a room, destroying it when the last member departs
    #[instrument(skip(self))]
    pub async fn leave_room(
        &self,
        room_key: &str,
        connection_id: &str,
    ) -> Result<LeaveRoomOutcome, AppError> {
        debug!(room_key = %room_key, connection_id = %connection_id, "Attempting to leave room");

        let outcome = self.repository.leave_room(room_key, connection_id).await?;

        match &outcome {
            LeaveRoomOutcome::Left {
                room, host_changed, ..
            } => {
                info!(
                    room_key = %room_key,
                    member_count = room.member_count(),
                    host_changed = host_changed,
                    "Member left room successfully"
                );
            }
            LeaveRoomOutcome::RoomDeleted { .. } => {
                info!(
                    room_key = %room_key,
                    "Room deleted after last member left"
                );
            }
            LeaveRoomOutcome::NotAMember => {
                debug!(
                    room_key = %room_key,
                    connection_id = %connection_id,
                    "Connection was not in room"
                );
            }
            LeaveRoomOutcome::RoomNotFound => {
                debug!(room_key = %room_key, "Room not found");
            }
        }

        Ok(outcome)
    }
}
