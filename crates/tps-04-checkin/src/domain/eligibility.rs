//! Eligibility view returned to the voter client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{Checkin, ElectionId, VoterId};

/// Read-only snapshot of a voter's standing in an election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    pub voter_id: VoterId,
    pub election_id: ElectionId,
    /// On the roll and flagged eligible.
    pub eligible: bool,
    pub has_voted: bool,
    pub voted_at: Option<DateTime<Utc>>,
    /// PENDING check-in, or APPROVED one still inside its window.
    pub active_checkin: Option<Checkin>,
}

impl Eligibility {
    /// Voter may scan now.
    pub fn can_check_in(&self) -> bool {
        self.eligible && !self.has_voted && self.active_checkin.is_none()
    }
}
