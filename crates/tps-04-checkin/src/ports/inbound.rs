//! Inbound Ports (Driving Ports / API)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{Checkin, CheckinId, ElectionId, OperatorId, StationId, TpsError, VoterId};

use crate::domain::Eligibility;

/// Result of a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub checkin: Checkin,
    /// `false` when an existing active check-in was returned.
    pub created: bool,
}

/// Check-in state machine API
#[async_trait]
pub trait CheckinApi: Send + Sync {
    /// Voter scans a station QR. Idempotent per (election, voter) while a
    /// check-in is active.
    async fn scan(&self, voter_id: VoterId, payload: &str) -> Result<ScanOutcome, TpsError>;

    /// Operator approves a PENDING check-in at their station.
    async fn approve(
        &self,
        operator_id: OperatorId,
        station_id: StationId,
        checkin_id: CheckinId,
    ) -> Result<Checkin, TpsError>;

    /// Operator rejects a PENDING check-in at their station.
    async fn reject(
        &self,
        operator_id: OperatorId,
        station_id: StationId,
        checkin_id: CheckinId,
        reason: Option<String>,
    ) -> Result<Checkin, TpsError>;

    /// Voter's standing in an election. Never writes.
    async fn get_eligibility(
        &self,
        voter_id: VoterId,
        election_id: ElectionId,
    ) -> Result<Eligibility, TpsError>;
}
