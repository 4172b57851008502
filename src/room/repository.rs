use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::models::{ClockTick, Member, RoleAssignment, RoomModel, VoteOutcome};
use crate::shared::AppError;

/// Result of joining a room. The room is created on first join, so there is
/// no not-found case here.
#[derive(Debug, Clone)]
pub enum JoinRoomOutcome {
    /// Joined (or just created) the room; carries the post-join snapshot
    Joined(RoomModel),
    /// The connection is already a member; nothing changed
    AlreadyMember,
}

/// Result of leaving a room
#[derive(Debug, Clone)]
pub enum LeaveRoomOutcome {
    /// Member removed; carries the post-leave snapshot and whether the host
    /// moved to someone else
    Left {
        room: RoomModel,
        departed: Member,
        host_changed: bool,
    },
    /// The last member left and the room was destroyed
    RoomDeleted { departed: Member },
    /// The connection was not a member of this room
    NotAMember,
    /// Room does not exist
    RoomNotFound,
}

/// Result of starting a round
#[derive(Debug, Clone)]
pub enum RoundStartOutcome {
    /// Round is running; carries the role notifications for the members
    /// present at the start instant and the clock sequence to tick with
    Started {
        assignments: Vec<RoleAssignment>,
        seq: u64,
    },
    /// Room does not exist
    RoomNotFound,
}

/// Result of a restart request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestartRoundOutcome {
    /// Round state cleared, room back in Waiting
    Reset,
    /// Refused because an explanation phase is live
    RefusedExplaining,
    /// Room does not exist
    RoomNotFound,
}

/// Storage and serialization point for all room state. Every method is one
/// atomic step under the registry lock; callers never observe a room between
/// two half-applied mutations.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn get_room(&self, room_key: &str) -> Result<Option<RoomModel>, AppError>;

    /// Joins a room, creating it first if the key is unknown.
    async fn join_room(
        &self,
        room_key: &str,
        connection_id: &str,
        display_name: &str,
    ) -> Result<JoinRoomOutcome, AppError>;

    /// Removes a connection from a room, destroying the room when it empties.
    async fn leave_room(
        &self,
        room_key: &str,
        connection_id: &str,
    ) -> Result<LeaveRoomOutcome, AppError>;

    /// Resets round state and moves the room into Explaining with the given
    /// topic and per-turn countdown.
    async fn begin_round(
        &self,
        room_key: &str,
        topic: &str,
        countdown_init: u32,
    ) -> Result<RoundStartOutcome, AppError>;

    /// Records one vote. `None` when the room does not exist.
    async fn record_vote(
        &self,
        room_key: &str,
        voter: &str,
        target: &str,
    ) -> Result<Option<VoteOutcome>, AppError>;

    /// Advances the explanation clock by one beat. A tick for a missing room
    /// is stale by definition.
    async fn advance_turn_clock(&self, room_key: &str, seq: u64) -> Result<ClockTick, AppError>;

    /// Returns the room to Waiting unless an explanation phase is live.
    async fn reset_round(&self, room_key: &str) -> Result<RestartRoundOutcome, AppError>;
}

/// In-memory implementation of RoomRepository; the process is the single
/// authority for room state.
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<String, RoomModel>>,
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    #[instrument(skip(self))]
    async fn get_room(&self, room_key: &str) -> Result<Option<RoomModel>, AppError> {
        let rooms = self.rooms.lock().unwrap();
        Ok(rooms.get(room_key).cloned())
    }

    #[instrument(skip(self))]
    async fn join_room(
        &self,
        room_key: &str,
        connection_id: &str,
        display_name: &str,
    ) -> Result<JoinRoomOutcome, AppError> {
        let mut rooms = self.rooms.lock().unwrap();

        let room = rooms
            .entry(room_key.to_string())
            .or_insert_with(|| {
                debug!(room_key = %room_key, "Creating room on first join");
                RoomModel::new(room_key.to_string())
            });

        if !room.add_member(connection_id.to_string(), display_name.to_string()) {
            warn!(
                room_key = %room_key,
                connection_id = %connection_id,
                "Duplicate join ignored"
            );
            return Ok(JoinRoomOutcome::AlreadyMember);
        }

        let updated_room = room.clone();
        info!(
            room_key = %room_key,
            display_name = %display_name,
            member_count = updated_room.member_count(),
            "Member joined room"
        );

        Ok(JoinRoomOutcome::Joined(updated_room))
    }

    #[instrument(skip(self))]
    async fn leave_room(
        &self,
        room_key: &str,
        connection_id: &str,
    ) -> Result<LeaveRoomOutcome, AppError> {
        let mut rooms = self.rooms.lock().unwrap();

        let room = match rooms.get_mut(room_key) {
            Some(room) => room,
            None => {
                debug!(room_key = %room_key, "Leave for unknown room");
                return Ok(LeaveRoomOutcome::RoomNotFound);
            }
        };

        let host_before = room.host_id.clone();
        let departed = match room.remove_member(connection_id) {
            Some(departed) => departed,
            None => {
                debug!(room_key = %room_key, connection_id = %connection_id, "Leave from non-member");
                return Ok(LeaveRoomOutcome::NotAMember);
            }
        };

        if room.members.is_empty() {
            info!(room_key = %room_key, "Room is empty, destroying it");
            rooms.remove(room_key);
            return Ok(LeaveRoomOutcome::RoomDeleted { departed });
        }

        let host_changed = room.host_id != host_before;
        if host_changed {
            info!(
                room_key = %room_key,
                new_host = ?room.host_id,
                "Host left, reassigned to first remaining member"
            );
        }

        let updated_room = room.clone();
        info!(
            room_key = %room_key,
            display_name = %departed.display_name,
            member_count = updated_room.member_count(),
            "Member left room"
        );

        Ok(LeaveRoomOutcome::Left {
            room: updated_room,
            departed,
            host_changed,
        })
    }

    #[instrument(skip(self))]
    async fn begin_round(
        &self,
        room_key: &str,
        topic: &str,
        countdown_init: u32,
    ) -> Result<RoundStartOutcome, AppError> {
        let mut rooms = self.rooms.lock().unwrap();

        let room = match rooms.get_mut(room_key) {
            Some(room) => room,
            None => {
                debug!(room_key = %room_key, "Start for unknown room");
                return Ok(RoundStartOutcome::RoomNotFound);
            }
        };

        let assignments = room.begin_round(topic.to_string(), countdown_init);
        let seq = room.round.seq;

        info!(
            room_key = %room_key,
            member_count = assignments.len(),
            seq = seq,
            "Round started"
        );

        Ok(RoundStartOutcome::Started { assignments, seq })
    }

    #[instrument(skip(self))]
    async fn record_vote(
        &self,
        room_key: &str,
        voter: &str,
        target: &str,
    ) -> Result<Option<VoteOutcome>, AppError> {
        let mut rooms = self.rooms.lock().unwrap();

        let room = match rooms.get_mut(room_key) {
            Some(room) => room,
            None => {
                debug!(room_key = %room_key, "Vote for unknown room");
                return Ok(None);
            }
        };

        let outcome = room.record_vote(voter, target);
        debug!(
            room_key = %room_key,
            voter = %voter,
            target = %target,
            outcome = ?outcome,
            "Vote processed"
        );

        Ok(Some(outcome))
    }

    #[instrument(skip(self), level = "debug")]
    async fn advance_turn_clock(&self, room_key: &str, seq: u64) -> Result<ClockTick, AppError> {
        let mut rooms = self.rooms.lock().unwrap();

        let room = match rooms.get_mut(room_key) {
            Some(room) => room,
            None => return Ok(ClockTick::Stale),
        };

        Ok(room.advance_turn_clock(seq))
    }

    #[instrument(skip(self))]
    async fn reset_round(&self, room_key: &str) -> Result<RestartRoundOutcome, AppError> {
        let mut rooms = self.rooms.lock().unwrap();

        let room = match rooms.get_mut(room_key) {
            Some(room) => room,
            None => {
                debug!(room_key = %room_key, "Restart for unknown room");
                return Ok(RestartRoundOutcome::RoomNotFound);
            }
        };

        if !room.reset_round() {
            warn!(room_key = %room_key, "Restart refused while explaining");
            return Ok(RestartRoundOutcome::RefusedExplaining);
        }

        info!(room_key = %room_key, "Round reset, room back in waiting");
        Ok(RestartRoundOutcome::Reset)
    }
}
