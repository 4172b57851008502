// Round-scoped state and the vote-resolution rules. Membership and stage
// transitions live on the room model; this module owns what resets between
// rounds.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Name rendered in announcements when the odd-one-out cannot be resolved,
/// either because the round started with a single member or because the
/// odd-one-out disconnected mid-round.
pub const UNKNOWN_PLAYER: &str = "???";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Role {
    Citizen,
    OddOneOut,
}

/// Per-round fields of a room. Cleared on every round start and on restart;
/// `seq` is monotonic across rounds so ticks from a cancelled turn clock can
/// be told apart from the live one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub topic: Option<String>,
    pub odd_one_out: Option<String>,
    pub votes_cast: HashMap<String, String>,
    pub vote_tally: HashMap<String, u32>,
    pub turn_index: u32,
    pub countdown: u32,
    pub countdown_init: u32,
    pub seq: u64,
}

impl RoundState {
    pub fn new() -> Self {
        Self {
            topic: None,
            odd_one_out: None,
            votes_cast: HashMap::new(),
            vote_tally: HashMap::new(),
            turn_index: 0,
            countdown: 0,
            countdown_init: 0,
            seq: 0,
        }
    }

    /// Clears everything round-scoped. `seq` survives so the next round's
    /// clock never aliases an old one.
    pub fn clear(&mut self) {
        self.topic = None;
        self.odd_one_out = None;
        self.votes_cast.clear();
        self.vote_tally.clear();
        self.turn_index = 0;
        self.countdown = 0;
        self.countdown_init = 0;
    }

    pub fn has_voted(&self, voter: &str) -> bool {
        self.votes_cast.contains_key(voter)
    }

    pub fn tally_for(&self, target: &str) -> u32 {
        self.vote_tally.get(target).copied().unwrap_or(0)
    }
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundResult {
    Draw { odd_one_out: String },
    CorrectGuess { odd_one_out: String },
    IncorrectGuess { chosen: String, odd_one_out: String },
}

impl RoundResult {
    pub fn announcement(&self) -> String {
        match self {
            RoundResult::Draw { odd_one_out } => {
                format!("The vote was a draw! The liar was {}.", odd_one_out)
            }
            RoundResult::CorrectGuess { odd_one_out } => {
                format!("{} was the liar! The citizens win.", odd_one_out)
            }
            RoundResult::IncorrectGuess {
                chosen,
                odd_one_out,
            } => {
                format!(
                    "{} was not the liar. The liar was {}. The liar wins.",
                    chosen, odd_one_out
                )
            }
        }
    }
}

/// Resolves a completed vote. A tie for the most votes is a draw; a sole top
/// candidate either is the odd-one-out (citizens win) or is not (odd-one-out
/// wins). `odd_one_out_name` is the live display name, absent when the
/// odd-one-out was never assigned or already left the room.
pub fn compute_result(
    vote_tally: &HashMap<String, u32>,
    odd_one_out_name: Option<&str>,
) -> RoundResult {
    let resolved = odd_one_out_name.unwrap_or(UNKNOWN_PLAYER).to_string();

    let max_votes = vote_tally.values().copied().max().unwrap_or(0);
    let top_candidates: Vec<&String> = vote_tally
        .iter()
        .filter(|(_, count)| **count == max_votes)
        .map(|(name, _)| name)
        .collect();

    if top_candidates.len() != 1 {
        return RoundResult::Draw {
            odd_one_out: resolved,
        };
    }

    let chosen = top_candidates[0].clone();
    if odd_one_out_name == Some(chosen.as_str()) {
        RoundResult::CorrectGuess {
            odd_one_out: resolved,
        }
    } else {
        RoundResult::IncorrectGuess {
            chosen,
            odd_one_out: resolved,
        }
    }
}
