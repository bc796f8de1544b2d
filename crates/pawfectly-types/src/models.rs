use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type UserId = i64;
pub type MatchId = i64;

/// Stored state of a pairwise relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Match,
    Unmatch,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Match => "match",
            MatchStatus::Unmatch => "unmatch",
        }
    }

    /// `match` and `unmatch` never change once reached.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MatchStatus::Pending)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for MatchStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MatchStatus::Pending),
            "match" => Ok(MatchStatus::Match),
            "unmatch" => Ok(MatchStatus::Unmatch),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// What the acting user asks for when proposing or responding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredStatus {
    Match,
    Unmatch,
}

impl DesiredStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DesiredStatus::Match => "match",
            DesiredStatus::Unmatch => "unmatch",
        }
    }

    /// Status of a record created by this request. An unmatch-first
    /// proposal skips the pending phase.
    pub fn initial_status(&self) -> MatchStatus {
        match self {
            DesiredStatus::Match => MatchStatus::Pending,
            DesiredStatus::Unmatch => MatchStatus::Unmatch,
        }
    }

    /// Status a pending record moves to when answered with this request.
    pub fn resolved_status(&self) -> MatchStatus {
        match self {
            DesiredStatus::Match => MatchStatus::Match,
            DesiredStatus::Unmatch => MatchStatus::Unmatch,
        }
    }
}

impl fmt::Display for DesiredStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DesiredStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "match" => Ok(DesiredStatus::Match),
            "unmatch" => Ok(DesiredStatus::Unmatch),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Result of a propose-or-respond call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalOutcome {
    /// No record existed; one was created.
    Created { match_id: MatchId, status: MatchStatus },
    /// A pending record was resolved.
    Transitioned { match_id: MatchId, status: MatchStatus },
    /// The record was already terminal. Nothing was written.
    Unchanged,
}

impl ProposalOutcome {
    /// Affected record id, or 0 when nothing changed.
    pub fn match_id(&self) -> MatchId {
        match self {
            ProposalOutcome::Created { match_id, .. }
            | ProposalOutcome::Transitioned { match_id, .. } => *match_id,
            ProposalOutcome::Unchanged => 0,
        }
    }

    pub fn status(&self) -> Option<MatchStatus> {
        match self {
            ProposalOutcome::Created { status, .. }
            | ProposalOutcome::Transitioned { status, .. } => Some(*status),
            ProposalOutcome::Unchanged => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: MatchId,
    pub initiator: UserId,
    pub counterpart: UserId,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn involves(&self, user_id: UserId) -> bool {
        self.initiator == user_id || self.counterpart == user_id
    }
}

/// Full profile as returned to clients. The password hash never leaves
/// the store layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: UserId,
    pub email: String,
    pub pet_type: Option<String>,
    pub image: Option<String>,
    pub pet_breeds: Option<String>,
    pub gender: Option<String>,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub city: Option<String>,
    pub bio: Option<String>,
}

/// A user shown in someone's feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: UserId,
    pub pet_type: Option<String>,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i64>,
    pub pet_breeds: Option<String>,
    pub image: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadMessage {
    pub id: i64,
    #[serde(rename = "message")]
    pub body: String,
    pub sender_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// One entry of a user's room list: an active match and its latest message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub counterpart_id: UserId,
    pub counterpart_name: Option<String>,
    pub counterpart_age: Option<i64>,
    #[serde(rename = "matchesId")]
    pub match_id: MatchId,
    pub profile_pic: Option<String>,
    pub last_message: Option<String>,
    pub last_message_time: Option<DateTime<Utc>>,
}
