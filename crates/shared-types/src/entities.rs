//! # Core Domain Entities
//!
//! Defines the TPS voting entities.
//!
//! ## Ownership
//!
//! - **Admin-owned (read-only here)**: `Station`, `StationQr`, `Election`,
//!   `Voter`, `Candidate`
//! - **Core-owned**: `Checkin`, `VoterStatus`, `Vote`

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{
    CandidateId, CheckinId, ElectionId, OperatorId, StationId, StationQrId, VoteId, VoterId,
};

// =============================================================================
// STATIONS
// =============================================================================

/// Lifecycle status of a polling station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StationStatus {
    /// Configured but not yet opened.
    Draft,
    /// Accepting check-ins.
    Active,
    /// Voting at this station has ended.
    Closed,
}

/// A physical polling station (TPS).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    /// Human code printed on the QR, e.g. `TPS01`.
    pub code: String,
    pub name: String,
    pub location: String,
    pub status: StationStatus,
    /// Election this station serves.
    pub election_id: ElectionId,
    /// Calendar date on which the station operates (station-local).
    pub voting_date: Option<NaiveDate>,
    /// Opening time of day (station-local, inclusive).
    pub open_time: Option<NaiveTime>,
    /// Closing time of day (station-local, exclusive).
    pub close_time: Option<NaiveTime>,
}

impl Station {
    /// Whether `now` falls inside the station's operating window.
    ///
    /// Unset date/time fields do not restrict the window.
    pub fn is_open_at(&self, now: DateTime<Utc>, offset: FixedOffset) -> bool {
        let local = now.with_timezone(&offset);

        if let Some(date) = self.voting_date {
            if local.date_naive() != date {
                return false;
            }
        }
        if let Some(open) = self.open_time {
            if local.time() < open {
                return false;
            }
        }
        if let Some(close) = self.close_time {
            if local.time() >= close {
                return false;
            }
        }
        true
    }
}

/// A QR secret issued for a station.
///
/// At most one row per station is active. Rows are never reactivated once
/// superseded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationQr {
    pub id: StationQrId,
    pub station_id: StationId,
    pub secret: String,
    pub active: bool,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// ELECTIONS, VOTERS, CANDIDATES
// =============================================================================

/// Phase of an election.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElectionPhase {
    Draft,
    Upcoming,
    Voting,
    Closed,
}

/// An election (external, read-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    pub id: ElectionId,
    pub name: String,
    pub phase: ElectionPhase,
    pub voting_starts_at: Option<DateTime<Utc>>,
    pub voting_ends_at: Option<DateTime<Utc>>,
}

impl Election {
    /// Whether ballots may be cast at `now`.
    pub fn is_voting_open_at(&self, now: DateTime<Utc>) -> bool {
        if self.phase != ElectionPhase::Voting {
            return false;
        }
        if self.voting_starts_at.is_some_and(|start| now < start) {
            return false;
        }
        if self.voting_ends_at.is_some_and(|end| now >= end) {
            return false;
        }
        true
    }
}

/// A voter on the roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub id: VoterId,
    /// Institutional identifier (student number, national id, ...).
    pub identifier: String,
    pub name: String,
    pub eligible: bool,
}

/// A candidate standing in an election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub election_id: ElectionId,
    pub number: u32,
    pub name: String,
}

// =============================================================================
// CHECK-INS
// =============================================================================

/// Check-in lifecycle status.
///
/// ```text
/// PENDING ──approve──→ APPROVED ──vote──→ VOTED
///    │                    │
///    └──reject──→ REJECTED └──sweep──→ EXPIRED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckinStatus {
    Pending,
    Approved,
    Rejected,
    Voted,
    Expired,
}

impl CheckinStatus {
    /// Terminal states never transition again.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Voted | Self::Expired)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Voted => "VOTED",
            Self::Expired => "EXPIRED",
        }
    }
}

impl std::fmt::Display for CheckinStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A voter's check-in at a station. Never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkin {
    pub id: CheckinId,
    pub station_id: StationId,
    pub voter_id: VoterId,
    pub election_id: ElectionId,
    pub status: CheckinStatus,
    pub scanned_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<OperatorId>,
    pub rejection_reason: Option<String>,
    /// Set only on approval.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Checkin {
    /// A freshly scanned check-in.
    pub fn pending(
        station_id: StationId,
        voter_id: VoterId,
        election_id: ElectionId,
        scanned_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CheckinId::new(),
            station_id,
            voter_id,
            election_id,
            status: CheckinStatus::Pending,
            scanned_at,
            approved_at: None,
            approved_by: None,
            rejection_reason: None,
            expires_at: None,
        }
    }

    /// Approved and the approval window has elapsed at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.status == CheckinStatus::Approved && self.expires_at.map_or(true, |exp| exp <= now)
    }

    /// PENDING, or APPROVED and still inside the approval window.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            CheckinStatus::Pending => true,
            CheckinStatus::Approved => !self.is_expired_at(now),
            _ => false,
        }
    }
}

// =============================================================================
// VOTER STATUS & VOTES
// =============================================================================

/// How a voter cast their ballot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VotingMethod {
    Online,
    Tps,
}

/// Per (election, voter) completion ledger. The double-vote guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterStatus {
    pub election_id: ElectionId,
    pub voter_id: VoterId,
    pub has_voted: bool,
    pub voted_at: Option<DateTime<Utc>>,
    pub voting_method: Option<VotingMethod>,
    pub tps_id: Option<StationId>,
}

impl VoterStatus {
    /// A roll entry for a voter who has not voted yet.
    pub fn not_voted(election_id: ElectionId, voter_id: VoterId) -> Self {
        Self {
            election_id,
            voter_id,
            has_voted: false,
            voted_at: None,
            voting_method: None,
            tps_id: None,
        }
    }
}

/// Channel through which a vote arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteChannel {
    Online,
    Tps,
}

/// An append-only ballot record. Carries no voter reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: VoteId,
    pub election_id: ElectionId,
    pub candidate_id: CandidateId,
    /// Hex-encoded keyed hash of the voter's receipt token.
    pub token_hash: String,
    pub channel: VoteChannel,
    pub station_id: Option<StationId>,
    pub cast_at: DateTime<Utc>,
}
