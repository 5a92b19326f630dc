//! # In-Memory Store Adapter
//!
//! Implements `TransactionalStore` with the guarantees the core relies on
//! from a relational store:
//!
//! - **Row locks**: `lock_*` calls block on a per-row async mutex held until
//!   the transaction ends.
//! - **Buffered writes**: a transaction's writes are invisible to others
//!   until commit, and visible to its own reads immediately.
//! - **Atomic commit**: constraints are validated and all writes applied
//!   under one table lock; a failed validation applies nothing.
//! - **Rollback on drop**: dropping an uncommitted transaction discards its
//!   writes and releases its locks.
//!
//! Admin-owned rows (stations, elections, voters, candidates, QRs) are
//! seeded through the inherent `insert_*` methods.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared_types::{
    CandidateId, Candidate, Checkin, CheckinId, CheckinStatus, Election, ElectionId, Station,
    StationId, StationQr, StationQrId, Vote, Voter, VoterId, VoterStatus,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use super::locks::{RowGuard, RowKey, RowLocks};
use crate::error::StoreError;
use crate::ports::store::{
    StoreTransaction, TransactionalStore, CHECKIN_ACTIVE_CONSTRAINT, STATION_QR_ACTIVE_CONSTRAINT,
};

type VoterKey = (ElectionId, VoterId);

#[derive(Debug, Default)]
struct Tables {
    stations: HashMap<StationId, Station>,
    station_qrs: HashMap<StationQrId, StationQr>,
    elections: HashMap<ElectionId, Election>,
    voters: HashMap<VoterId, Voter>,
    candidates: HashMap<CandidateId, Candidate>,
    checkins: HashMap<CheckinId, Checkin>,
    checkins_by_voter: HashMap<VoterKey, Vec<CheckinId>>,
    voter_statuses: HashMap<VoterKey, VoterStatus>,
    votes: Vec<Vote>,
}

#[derive(Debug)]
struct Shared {
    tables: RwLock<Tables>,
    locks: RowLocks,
    available: AtomicBool,
}

/// In-memory transactional store.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                tables: RwLock::new(Tables::default()),
                locks: RowLocks::default(),
                available: AtomicBool::new(true),
            }),
        }
    }

    /// Simulate the backing store going away (or coming back).
    pub fn set_available(&self, available: bool) {
        self.shared.available.store(available, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Seeding (admin-owned rows)
    // -------------------------------------------------------------------------

    pub fn insert_station(&self, station: Station) {
        self.shared.tables.write().stations.insert(station.id, station);
    }

    pub fn insert_station_qr(&self, qr: StationQr) {
        self.shared.tables.write().station_qrs.insert(qr.id, qr);
    }

    pub fn insert_election(&self, election: Election) {
        self.shared
            .tables
            .write()
            .elections
            .insert(election.id, election);
    }

    pub fn insert_voter(&self, voter: Voter) {
        self.shared.tables.write().voters.insert(voter.id, voter);
    }

    pub fn insert_candidate(&self, candidate: Candidate) {
        self.shared
            .tables
            .write()
            .candidates
            .insert(candidate.id, candidate);
    }

    /// Put a voter on an election's roll with `has_voted = false`.
    pub fn enroll_voter(&self, election_id: ElectionId, voter_id: VoterId) {
        self.put_voter_status(VoterStatus::not_voted(election_id, voter_id));
    }

    pub fn put_voter_status(&self, status: VoterStatus) {
        self.shared
            .tables
            .write()
            .voter_statuses
            .insert((status.election_id, status.voter_id), status);
    }

    // -------------------------------------------------------------------------
    // Inspection (committed state)
    // -------------------------------------------------------------------------

    pub fn checkin(&self, id: CheckinId) -> Option<Checkin> {
        self.shared.tables.read().checkins.get(&id).cloned()
    }

    pub fn checkins_for_voter(&self, election_id: ElectionId, voter_id: VoterId) -> Vec<Checkin> {
        let tables = self.shared.tables.read();
        tables
            .checkins_by_voter
            .get(&(election_id, voter_id))
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| tables.checkins.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn voter_status(&self, election_id: ElectionId, voter_id: VoterId) -> Option<VoterStatus> {
        self.shared
            .tables
            .read()
            .voter_statuses
            .get(&(election_id, voter_id))
            .cloned()
    }

    pub fn station_qrs(&self, station_id: StationId) -> Vec<StationQr> {
        self.shared
            .tables
            .read()
            .station_qrs
            .values()
            .filter(|qr| qr.station_id == station_id)
            .cloned()
            .collect()
    }

    pub fn votes(&self) -> Vec<Vote> {
        self.shared.tables.read().votes.clone()
    }

    /// Rows currently present in the lock table.
    pub fn tracked_locks(&self) -> usize {
        self.shared.locks.tracked_rows()
    }
}

#[async_trait]
impl TransactionalStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, StoreError> {
        ensure_available(&self.shared)?;
        Ok(Box::new(MemoryTransaction::new(Arc::clone(&self.shared))))
    }
}

fn ensure_available(shared: &Shared) -> Result<(), StoreError> {
    if shared.available.load(Ordering::SeqCst) {
        Ok(())
    } else {
        Err(StoreError::Unavailable("memory store offline".into()))
    }
}

// =============================================================================
// TRANSACTION
// =============================================================================

#[derive(Debug, Default)]
struct WriteSet {
    checkins: HashMap<CheckinId, Checkin>,
    station_qrs: HashMap<StationQrId, StationQr>,
    voter_statuses: HashMap<VoterKey, VoterStatus>,
    votes: Vec<Vote>,
}

impl WriteSet {
    fn is_empty(&self) -> bool {
        self.checkins.is_empty()
            && self.station_qrs.is_empty()
            && self.voter_statuses.is_empty()
            && self.votes.is_empty()
    }
}

/// A transaction over [`MemoryStore`].
pub struct MemoryTransaction {
    shared: Arc<Shared>,
    held: HashMap<RowKey, RowGuard>,
    writes: WriteSet,
    committed: bool,
}

impl MemoryTransaction {
    fn new(shared: Arc<Shared>) -> Self {
        Self {
            shared,
            held: HashMap::new(),
            writes: WriteSet::default(),
            committed: false,
        }
    }

    async fn lock_row(&mut self, key: RowKey) {
        if self.held.contains_key(&key) {
            return;
        }
        let guard = self.shared.locks.acquire(key).await;
        self.held.insert(key, guard);
    }

    fn read_checkin(&self, id: CheckinId) -> Option<Checkin> {
        if let Some(c) = self.writes.checkins.get(&id) {
            return Some(c.clone());
        }
        self.shared.tables.read().checkins.get(&id).cloned()
    }

    fn read_voter_checkins(&self, key: VoterKey) -> Vec<Checkin> {
        let tables = self.shared.tables.read();
        let mut ids: HashSet<CheckinId> = tables
            .checkins_by_voter
            .get(&key)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default();
        ids.extend(
            self.writes
                .checkins
                .values()
                .filter(|c| (c.election_id, c.voter_id) == key)
                .map(|c| c.id),
        );
        ids.into_iter()
            .filter_map(|id| {
                self.writes
                    .checkins
                    .get(&id)
                    .or_else(|| tables.checkins.get(&id))
                    .cloned()
            })
            .collect()
    }

    fn read_station_qrs(&self, station_id: StationId) -> Vec<StationQr> {
        let tables = self.shared.tables.read();
        let mut qrs: HashMap<StationQrId, StationQr> = tables
            .station_qrs
            .values()
            .filter(|qr| qr.station_id == station_id)
            .map(|qr| (qr.id, qr.clone()))
            .collect();
        for qr in self.writes.station_qrs.values() {
            if qr.station_id == station_id {
                qrs.insert(qr.id, qr.clone());
            }
        }
        let mut qrs: Vec<StationQr> = qrs.into_values().collect();
        qrs.sort_by_key(|qr| qr.created_at);
        qrs
    }

    fn read_voter_status(&self, key: VoterKey) -> Option<VoterStatus> {
        if let Some(s) = self.writes.voter_statuses.get(&key) {
            return Some(s.clone());
        }
        self.shared.tables.read().voter_statuses.get(&key).cloned()
    }

    fn read_lapsed(&self, now: DateTime<Utc>, limit: usize) -> Vec<CheckinId> {
        let tables = self.shared.tables.read();
        let lapsed = |c: &Checkin| {
            c.status == CheckinStatus::Approved && c.expires_at.is_some_and(|exp| exp <= now)
        };
        let mut ids: Vec<CheckinId> = tables
            .checkins
            .values()
            .map(|c| self.writes.checkins.get(&c.id).unwrap_or(c))
            .chain(
                self.writes
                    .checkins
                    .values()
                    .filter(|c| !tables.checkins.contains_key(&c.id)),
            )
            .filter(|c| lapsed(c))
            .map(|c| c.id)
            .collect();
        ids.truncate(limit);
        ids
    }

    fn checkin_exists(&self, id: CheckinId) -> bool {
        self.writes.checkins.contains_key(&id) || self.shared.tables.read().checkins.contains_key(&id)
    }

    fn station_qr_exists(&self, id: StationQrId) -> bool {
        self.writes.station_qrs.contains_key(&id)
            || self.shared.tables.read().station_qrs.contains_key(&id)
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn station(&mut self, id: StationId) -> Result<Option<Station>, StoreError> {
        Ok(self.shared.tables.read().stations.get(&id).cloned())
    }

    async fn station_by_code(&mut self, code: &str) -> Result<Option<Station>, StoreError> {
        Ok(self
            .shared
            .tables
            .read()
            .stations
            .values()
            .find(|s| s.code == code)
            .cloned())
    }

    async fn election(&mut self, id: ElectionId) -> Result<Option<Election>, StoreError> {
        Ok(self.shared.tables.read().elections.get(&id).cloned())
    }

    async fn voter(&mut self, id: VoterId) -> Result<Option<Voter>, StoreError> {
        Ok(self.shared.tables.read().voters.get(&id).cloned())
    }

    async fn candidate_in_election(
        &mut self,
        election_id: ElectionId,
        candidate_id: CandidateId,
    ) -> Result<bool, StoreError> {
        Ok(self
            .shared
            .tables
            .read()
            .candidates
            .get(&candidate_id)
            .is_some_and(|c| c.election_id == election_id))
    }

    async fn station_qrs(&mut self, station_id: StationId) -> Result<Vec<StationQr>, StoreError> {
        Ok(self.read_station_qrs(station_id))
    }

    async fn lock_station_qrs(
        &mut self,
        station_id: StationId,
    ) -> Result<Vec<StationQr>, StoreError> {
        self.lock_row(RowKey::StationQrs(station_id)).await;
        Ok(self.read_station_qrs(station_id))
    }

    async fn insert_station_qr(&mut self, qr: StationQr) -> Result<(), StoreError> {
        if self.station_qr_exists(qr.id) {
            return Err(StoreError::Backend(format!("duplicate station_qr id {}", qr.id)));
        }
        self.writes.station_qrs.insert(qr.id, qr);
        Ok(())
    }

    async fn update_station_qr(&mut self, qr: StationQr) -> Result<(), StoreError> {
        if !self.station_qr_exists(qr.id) {
            return Err(StoreError::Backend(format!("station_qr {} not found", qr.id)));
        }
        self.writes.station_qrs.insert(qr.id, qr);
        Ok(())
    }

    async fn checkin(&mut self, id: CheckinId) -> Result<Option<Checkin>, StoreError> {
        Ok(self.read_checkin(id))
    }

    async fn lock_checkin(&mut self, id: CheckinId) -> Result<Option<Checkin>, StoreError> {
        self.lock_row(RowKey::Checkin(id)).await;
        Ok(self.read_checkin(id))
    }

    async fn latest_checkin(
        &mut self,
        election_id: ElectionId,
        voter_id: VoterId,
        statuses: &[CheckinStatus],
    ) -> Result<Option<Checkin>, StoreError> {
        Ok(self
            .read_voter_checkins((election_id, voter_id))
            .into_iter()
            .filter(|c| statuses.contains(&c.status))
            .max_by_key(|c| c.scanned_at))
    }

    async fn lapsed_approvals(
        &mut self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<CheckinId>, StoreError> {
        Ok(self.read_lapsed(now, limit))
    }

    async fn insert_checkin(&mut self, checkin: Checkin) -> Result<(), StoreError> {
        if self.checkin_exists(checkin.id) {
            return Err(StoreError::Backend(format!("duplicate checkin id {}", checkin.id)));
        }
        self.writes.checkins.insert(checkin.id, checkin);
        Ok(())
    }

    async fn update_checkin(&mut self, checkin: Checkin) -> Result<(), StoreError> {
        if !self.checkin_exists(checkin.id) {
            return Err(StoreError::Backend(format!("checkin {} not found", checkin.id)));
        }
        self.writes.checkins.insert(checkin.id, checkin);
        Ok(())
    }

    async fn voter_status(
        &mut self,
        election_id: ElectionId,
        voter_id: VoterId,
    ) -> Result<Option<VoterStatus>, StoreError> {
        Ok(self.read_voter_status((election_id, voter_id)))
    }

    async fn lock_voter_status(
        &mut self,
        election_id: ElectionId,
        voter_id: VoterId,
    ) -> Result<Option<VoterStatus>, StoreError> {
        self.lock_row(RowKey::VoterStatus(election_id, voter_id))
            .await;
        Ok(self.read_voter_status((election_id, voter_id)))
    }

    async fn update_voter_status(&mut self, status: VoterStatus) -> Result<(), StoreError> {
        let key = (status.election_id, status.voter_id);
        if self.read_voter_status(key).is_none() {
            return Err(StoreError::Backend(format!(
                "voter_status ({}, {}) not found",
                key.0, key.1
            )));
        }
        self.writes.voter_statuses.insert(key, status);
        Ok(())
    }

    async fn insert_vote(&mut self, vote: Vote) -> Result<(), StoreError> {
        self.writes.votes.push(vote);
        Ok(())
    }

    async fn commit(mut self: Box<Self>) -> Result<(), StoreError> {
        ensure_available(&self.shared)?;
        let writes = std::mem::take(&mut self.writes);
        {
            let mut tables = self.shared.tables.write();
            validate(&tables, &writes)?;
            apply(&mut tables, writes);
        }
        self.committed = true;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}

impl Drop for MemoryTransaction {
    fn drop(&mut self) {
        if !self.committed && !self.writes.is_empty() {
            debug!(
                checkins = self.writes.checkins.len(),
                votes = self.writes.votes.len(),
                "Transaction rolled back"
            );
        }
        for (key, guard) in self.held.drain() {
            self.shared.locks.release(key, guard);
        }
    }
}

/// Check partial-unique constraints against the post-commit state.
fn validate(tables: &Tables, writes: &WriteSet) -> Result<(), StoreError> {
    let merged_checkin = |id: &CheckinId| writes.checkins.get(id).or_else(|| tables.checkins.get(id));

    let touched_voters: HashSet<VoterKey> = writes
        .checkins
        .values()
        .map(|c| (c.election_id, c.voter_id))
        .collect();
    for key in touched_voters {
        let mut ids: HashSet<CheckinId> = tables
            .checkins_by_voter
            .get(&key)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default();
        ids.extend(
            writes
                .checkins
                .values()
                .filter(|c| (c.election_id, c.voter_id) == key)
                .map(|c| c.id),
        );
        let active = ids
            .iter()
            .filter_map(merged_checkin)
            .filter(|c| matches!(c.status, CheckinStatus::Pending | CheckinStatus::Approved))
            .count();
        if active > 1 {
            return Err(StoreError::UniqueViolation {
                constraint: CHECKIN_ACTIVE_CONSTRAINT,
            });
        }
    }

    let touched_stations: HashSet<StationId> =
        writes.station_qrs.values().map(|qr| qr.station_id).collect();
    for station_id in touched_stations {
        let mut ids: HashSet<StationQrId> = tables
            .station_qrs
            .values()
            .filter(|qr| qr.station_id == station_id)
            .map(|qr| qr.id)
            .collect();
        ids.extend(
            writes
                .station_qrs
                .values()
                .filter(|qr| qr.station_id == station_id)
                .map(|qr| qr.id),
        );
        let active = ids
            .iter()
            .filter_map(|id| writes.station_qrs.get(id).or_else(|| tables.station_qrs.get(id)))
            .filter(|qr| qr.active)
            .count();
        if active > 1 {
            return Err(StoreError::UniqueViolation {
                constraint: STATION_QR_ACTIVE_CONSTRAINT,
            });
        }
    }

    Ok(())
}

fn apply(tables: &mut Tables, writes: WriteSet) {
    for (id, checkin) in writes.checkins {
        if !tables.checkins.contains_key(&id) {
            tables
                .checkins_by_voter
                .entry((checkin.election_id, checkin.voter_id))
                .or_default()
                .push(id);
        }
        tables.checkins.insert(id, checkin);
    }
    tables.station_qrs.extend(writes.station_qrs);
    tables.voter_statuses.extend(writes.voter_statuses);
    tables.votes.extend(writes.votes);
}
