use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::game::round::{compute_result, Role, RoundResult, RoundState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    Waiting,
    Explaining,
    Voting,
    Result,
}

/// One joined participant. Turn order is the order of the room's member list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub connection_id: String,
    pub display_name: String,
}

/// Private role notification captured at round start, one per member present
/// at that instant. The odd-one-out's entry carries no topic.
#[derive(Debug, Clone)]
pub struct RoleAssignment {
    pub connection_id: String,
    pub display_name: String,
    pub role: Role,
    pub topic: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VoteOutcome {
    Recorded {
        target: String,
        votes: u32,
    },
    Completed {
        target: String,
        votes: u32,
        result: RoundResult,
    },
    AlreadyVoted,
    NotAMember,
    WrongStage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockTick {
    /// Broadcast this pair; the clock keeps running.
    Tick { turn_index: u32, countdown: u32 },
    /// Broadcast this pair, then the room has moved to Voting.
    PhaseComplete { turn_index: u32, countdown: u32 },
    /// Tick from a destroyed, restarted, or no-longer-explaining round.
    Stale,
}

/// In-memory state of one room. All mutation happens through the repository,
/// which serializes access; methods here assume exclusive access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomModel {
    pub room_key: String,
    pub members: Vec<Member>,
    pub host_id: Option<String>,
    pub stage: Stage,
    pub round: RoundState,
}

impl RoomModel {
    pub fn new(room_key: String) -> Self {
        Self {
            room_key,
            members: vec![],
            host_id: None,
            stage: Stage::Waiting,
            round: RoundState::new(),
        }
    }

    pub fn has_member(&self, connection_id: &str) -> bool {
        self.members
            .iter()
            .any(|m| m.connection_id == connection_id)
    }

    pub fn member_name(&self, connection_id: &str) -> Option<&str> {
        self.members
            .iter()
            .find(|m| m.connection_id == connection_id)
            .map(|m| m.display_name.as_str())
    }

    pub fn is_member_name(&self, display_name: &str) -> bool {
        self.members.iter().any(|m| m.display_name == display_name)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Appends a member unless the connection is already present. The first
    /// joiner becomes host.
    pub fn add_member(&mut self, connection_id: String, display_name: String) -> bool {
        if self.has_member(&connection_id) {
            return false;
        }
        if self.host_id.is_none() {
            self.host_id = Some(connection_id.clone());
        }
        self.members.push(Member {
            connection_id,
            display_name,
        });
        true
    }

    /// Removes a member, reassigning the host to the new first member when
    /// the host itself left. Returns the departed member.
    pub fn remove_member(&mut self, connection_id: &str) -> Option<Member> {
        let position = self
            .members
            .iter()
            .position(|m| m.connection_id == connection_id)?;
        let departed = self.members.remove(position);

        if self.host_id.as_deref() == Some(connection_id) {
            self.host_id = self.members.first().map(|m| m.connection_id.clone());
        }
        Some(departed)
    }

    /// Member whose explanation turn is active, if a round is running.
    pub fn current_speaker(&self) -> Option<&Member> {
        if self.stage != Stage::Explaining || self.members.is_empty() {
            return None;
        }
        self.members
            .get(self.round.turn_index as usize % self.members.len())
    }

    /// Starts a round: clears round state, draws the odd-one-out (only when
    /// more than one member is present), moves to Explaining, and returns the
    /// role notification for every current member.
    pub fn begin_round(&mut self, topic: String, countdown_init: u32) -> Vec<RoleAssignment> {
        self.round.clear();
        self.round.seq += 1;
        self.round.topic = Some(topic.clone());
        self.round.countdown = countdown_init;
        self.round.countdown_init = countdown_init;

        if self.members.len() > 1 {
            self.round.odd_one_out = self
                .members
                .choose(&mut rand::rng())
                .map(|m| m.connection_id.clone());
        }

        self.stage = Stage::Explaining;

        self.members
            .iter()
            .map(|m| {
                let role = if self.round.odd_one_out.as_deref() == Some(&m.connection_id) {
                    Role::OddOneOut
                } else {
                    Role::Citizen
                };
                RoleAssignment {
                    connection_id: m.connection_id.clone(),
                    display_name: m.display_name.clone(),
                    role,
                    topic: match role {
                        Role::OddOneOut => None,
                        Role::Citizen => Some(topic.clone()),
                    },
                }
            })
            .collect()
    }

    /// Records one vote. Completion fires when the cast count reaches the
    /// live member count; the result is computed in the same step so it can
    /// never be computed twice.
    pub fn record_vote(&mut self, voter: &str, target: &str) -> VoteOutcome {
        if self.stage != Stage::Voting {
            return VoteOutcome::WrongStage;
        }
        if !self.is_member_name(voter) {
            return VoteOutcome::NotAMember;
        }
        if self.round.has_voted(voter) {
            return VoteOutcome::AlreadyVoted;
        }

        self.round
            .votes_cast
            .insert(voter.to_string(), target.to_string());
        *self
            .round
            .vote_tally
            .entry(target.to_string())
            .or_insert(0) += 1;
        let votes = self.round.tally_for(target);

        if self.round.votes_cast.len() >= self.members.len() {
            let odd_name = self
                .round
                .odd_one_out
                .clone()
                .and_then(|id| self.member_name(&id).map(|n| n.to_string()));
            let result = compute_result(&self.round.vote_tally, odd_name.as_deref());
            self.stage = Stage::Result;
            return VoteOutcome::Completed {
                target: target.to_string(),
                votes,
                result,
            };
        }

        VoteOutcome::Recorded {
            target: target.to_string(),
            votes,
        }
    }

    /// One beat of the explanation clock. Broadcast values are captured
    /// before mutation, so a turn is observed from `countdown_init` down to
    /// zero before the index advances. The member count is read live; a
    /// shrinking room shortens the phase.
    pub fn advance_turn_clock(&mut self, seq: u64) -> ClockTick {
        if self.stage != Stage::Explaining || self.round.seq != seq {
            return ClockTick::Stale;
        }

        let turn_index = self.round.turn_index;
        let countdown = self.round.countdown;

        if countdown > 0 {
            self.round.countdown -= 1;
            ClockTick::Tick {
                turn_index,
                countdown,
            }
        } else if (turn_index as usize) + 1 < 2 * self.members.len() {
            self.round.turn_index += 1;
            self.round.countdown = self.round.countdown_init;
            ClockTick::Tick {
                turn_index,
                countdown,
            }
        } else {
            self.stage = Stage::Voting;
            ClockTick::PhaseComplete {
                turn_index,
                countdown,
            }
        }
    }

    /// Returns the room to Waiting with cleared round state. Refused while a
    /// turn clock is live (Explaining).
    pub fn reset_round(&mut self) -> bool {
        if self.stage == Stage::Explaining {
            return false;
        }
        self.round.clear();
        self.stage = Stage::Waiting;
        true
    }
}
