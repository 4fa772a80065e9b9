//! Petition voting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Direction of a petition vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteDirection {
    Up,
    Down,
}

/// What to do with the stored vote row after a user casts a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAction {
    /// No row existed: insert one with this direction.
    Cast(VoteDirection),
    /// A row with the opposite direction existed: update it in place.
    Switch(VoteDirection),
    /// A row with the same direction existed: delete it.
    Retract,
}

impl VoteDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    /// Per-(petition, user) state machine.
    ///
    /// | current | cast | action |
    /// |---------|------|--------|
    /// | none    | d    | `Cast(d)` |
    /// | d       | d    | `Retract` |
    /// | d       | !d   | `Switch(!d)` |
    pub fn transition(current: Option<VoteDirection>, cast: VoteDirection) -> VoteAction {
        match current {
            None => VoteAction::Cast(cast),
            Some(existing) if existing == cast => VoteAction::Retract,
            Some(_) => VoteAction::Switch(cast),
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is neither `"up"` nor `"down"`.
#[derive(Debug, Error)]
#[error("unknown vote direction: {0:?}")]
pub struct UnknownVoteDirection(pub String);

impl FromStr for VoteDirection {
    type Err = UnknownVoteDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(UnknownVoteDirection(other.to_owned())),
        }
    }
}

/// Number of votes per direction on a petition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VoteCounts {
    pub up: u64,
    pub down: u64,
}

impl VoteCounts {
    pub fn net(self) -> i64 {
        self.up as i64 - self.down as i64
    }

    pub fn total(self) -> u64 {
        self.up + self.down
    }
}
