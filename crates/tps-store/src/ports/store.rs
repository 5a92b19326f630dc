//! # Transactional Store Port
//!
//! The relational store the core runs against. Every operation of the core
//! happens inside one `StoreTransaction`; dropping a transaction without
//! calling `commit` rolls it back.
//!
//! ## Locking
//!
//! The `lock_*` methods are the `SELECT ... FOR UPDATE` analogue: they block
//! until the row lock is granted and hold it until commit or rollback. A
//! transaction that already holds a lock may request it again.
//!
//! ## Constraints enforced at commit
//!
//! | Constraint | Rows |
//! |------------|------|
//! | `checkins_one_active_per_voter` | at most one PENDING/APPROVED check-in per (election, voter) |
//! | `station_qrs_one_active` | at most one active QR per station |

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_types::{
    CandidateId, Checkin, CheckinId, CheckinStatus, Election, ElectionId, Station, StationId,
    StationQr, Vote, Voter, VoterId, VoterStatus,
};

use crate::error::StoreError;

/// Name of the partial unique index over non-terminal check-ins.
pub const CHECKIN_ACTIVE_CONSTRAINT: &str = "checkins_one_active_per_voter";

/// Name of the partial unique index over active station QRs.
pub const STATION_QR_ACTIVE_CONSTRAINT: &str = "station_qrs_one_active";

/// Entry point: opens transactions.
#[async_trait]
pub trait TransactionalStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError>;
}

/// A unit of work against the store.
#[async_trait]
pub trait StoreTransaction: Send {
    // -------------------------------------------------------------------------
    // External (read-only) lookups
    // -------------------------------------------------------------------------

    async fn station(&mut self, id: StationId) -> Result<Option<Station>, StoreError>;

    async fn station_by_code(&mut self, code: &str) -> Result<Option<Station>, StoreError>;

    async fn election(&mut self, id: ElectionId) -> Result<Option<Election>, StoreError>;

    async fn voter(&mut self, id: VoterId) -> Result<Option<Voter>, StoreError>;

    async fn candidate_in_election(
        &mut self,
        election_id: ElectionId,
        candidate_id: CandidateId,
    ) -> Result<bool, StoreError>;

    // -------------------------------------------------------------------------
    // Station QRs
    // -------------------------------------------------------------------------

    async fn station_qrs(&mut self, station_id: StationId) -> Result<Vec<StationQr>, StoreError>;

    /// Locks the station's QR set (single writer for rotation).
    async fn lock_station_qrs(
        &mut self,
        station_id: StationId,
    ) -> Result<Vec<StationQr>, StoreError>;

    async fn insert_station_qr(&mut self, qr: StationQr) -> Result<(), StoreError>;

    async fn update_station_qr(&mut self, qr: StationQr) -> Result<(), StoreError>;

    // -------------------------------------------------------------------------
    // Check-ins
    // -------------------------------------------------------------------------

    async fn checkin(&mut self, id: CheckinId) -> Result<Option<Checkin>, StoreError>;

    async fn lock_checkin(&mut self, id: CheckinId) -> Result<Option<Checkin>, StoreError>;

    /// Most recently scanned check-in for the voter whose status is in
    /// `statuses`.
    async fn latest_checkin(
        &mut self,
        election_id: ElectionId,
        voter_id: VoterId,
        statuses: &[CheckinStatus],
    ) -> Result<Option<Checkin>, StoreError>;

    /// Ids of APPROVED check-ins whose expiry is at or before `now`.
    async fn lapsed_approvals(
        &mut self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<CheckinId>, StoreError>;

    async fn insert_checkin(&mut self, checkin: Checkin) -> Result<(), StoreError>;

    async fn update_checkin(&mut self, checkin: Checkin) -> Result<(), StoreError>;

    // -------------------------------------------------------------------------
    // Voter status & votes
    // -------------------------------------------------------------------------

    /// Unlocked read of the voter's status row.
    async fn voter_status(
        &mut self,
        election_id: ElectionId,
        voter_id: VoterId,
    ) -> Result<Option<VoterStatus>, StoreError>;

    /// Exclusive lock on the voter's status row. Concurrent vote attempts for
    /// the same voter serialize here.
    async fn lock_voter_status(
        &mut self,
        election_id: ElectionId,
        voter_id: VoterId,
    ) -> Result<Option<VoterStatus>, StoreError>;

    async fn update_voter_status(&mut self, status: VoterStatus) -> Result<(), StoreError>;

    async fn insert_vote(&mut self, vote: Vote) -> Result<(), StoreError>;

    // -------------------------------------------------------------------------
    // Completion
    // -------------------------------------------------------------------------

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}
