//! Check-in Service
//!
//! Implements `CheckinApi`. Each operation runs in one store transaction
//! under the configured execution budget; events and audit entries go out
//! only after commit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use shared_types::{
    Checkin, CheckinId, CheckinStatus, ElectionId, OperatorId, Station, StationEvent, StationId,
    TimeSource, TpsError, VoterId, VoterSummary,
};
use std::sync::Arc;
use tps_01_qr_codec::resolve_payload;
use tps_02_notification_hub::EventPublisher;
use tps_03_access_guard::{check_pairing, AccessGuard};
use tps_store::{
    record_best_effort, with_timeout, AuditAction, AuditEntry, AuditSink, StoreTransaction,
    TransactionalStore,
};
use tracing::{debug, info, warn};

use crate::config::CheckinConfig;
use crate::domain::{ensure_accepting, transitions, Eligibility};
use crate::ports::inbound::{CheckinApi, ScanOutcome};

const NON_TERMINAL: [CheckinStatus; 2] = [CheckinStatus::Pending, CheckinStatus::Approved];

/// Operator decision on a pending check-in.
enum Decision {
    Approve,
    Reject(Option<String>),
}

/// What a committed scan produced, for the post-commit side effects.
struct ScanCommit {
    outcome: ScanOutcome,
    voter: Option<VoterSummary>,
    lapsed: Option<Checkin>,
}

/// Check-in state machine service
pub struct CheckinService {
    store: Arc<dyn TransactionalStore>,
    guard: Arc<AccessGuard>,
    publisher: Arc<dyn EventPublisher>,
    audit: Arc<dyn AuditSink>,
    time: Arc<dyn TimeSource>,
    config: CheckinConfig,
}

impl CheckinService {
    pub fn new(
        store: Arc<dyn TransactionalStore>,
        guard: Arc<AccessGuard>,
        publisher: Arc<dyn EventPublisher>,
        audit: Arc<dyn AuditSink>,
        time: Arc<dyn TimeSource>,
        config: CheckinConfig,
    ) -> Self {
        Self {
            store,
            guard,
            publisher,
            audit,
            time,
            config,
        }
    }

    fn ensure_station_accepting(
        &self,
        station: &Station,
        now: DateTime<Utc>,
    ) -> Result<(), TpsError> {
        ensure_accepting(
            station,
            now,
            self.config.station_offset(),
            self.config.enforce_station_hours,
        )
    }

    async fn ensure_election_open(
        tx: &mut dyn StoreTransaction,
        election_id: ElectionId,
        now: DateTime<Utc>,
    ) -> Result<(), TpsError> {
        let open = tx
            .election(election_id)
            .await?
            .is_some_and(|election| election.is_voting_open_at(now));
        if !open {
            return Err(TpsError::ElectionNotOpen);
        }
        Ok(())
    }

    async fn ensure_not_voted(
        tx: &mut dyn StoreTransaction,
        election_id: ElectionId,
        voter_id: VoterId,
    ) -> Result<(), TpsError> {
        let status = tx
            .voter_status(election_id, voter_id)
            .await?
            .ok_or(TpsError::NotEligible)?;
        if status.has_voted {
            return Err(TpsError::AlreadyVoted);
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Scan
    // -------------------------------------------------------------------------

    async fn scan_in_tx(
        &self,
        voter_id: VoterId,
        payload: &str,
        now: DateTime<Utc>,
    ) -> Result<ScanCommit, TpsError> {
        let mut tx = self.store.begin().await?;

        let (station, _qr) = resolve_payload(tx.as_mut(), payload).await?;
        self.ensure_station_accepting(&station, now)?;

        let election_id = station.election_id;
        Self::ensure_election_open(tx.as_mut(), election_id, now).await?;

        let voter = tx
            .voter(voter_id)
            .await?
            .filter(|voter| voter.eligible)
            .ok_or(TpsError::NotEligible)?;
        Self::ensure_not_voted(tx.as_mut(), election_id, voter_id).await?;

        let mut lapsed = None;
        if let Some(existing) = tx.latest_checkin(election_id, voter_id, &NON_TERMINAL).await? {
            if existing.is_active_at(now) {
                debug!(
                    checkin_id = %existing.id,
                    voter_id = %voter_id,
                    "[tps-04] Returning existing active check-in"
                );
                return Ok(ScanCommit {
                    outcome: ScanOutcome {
                        checkin: existing,
                        created: false,
                    },
                    voter: None,
                    lapsed: None,
                });
            }

            // Approval lapsed without a sweep; retire it so the new row is
            // the only non-terminal one.
            if let Some(locked) = tx.lock_checkin(existing.id).await? {
                match transitions::expire(locked, now) {
                    Some(expired) => {
                        tx.update_checkin(expired.clone()).await?;
                        lapsed = Some(expired);
                    }
                    // Consumed by a vote that committed while we waited
                    None => Self::ensure_not_voted(tx.as_mut(), election_id, voter_id).await?,
                }
            }
        }

        let checkin = Checkin::pending(station.id, voter_id, election_id, now);
        tx.insert_checkin(checkin.clone()).await?;

        match tx.commit().await {
            Ok(()) => Ok(ScanCommit {
                outcome: ScanOutcome {
                    checkin,
                    created: true,
                },
                voter: Some(VoterSummary::from(&voter)),
                lapsed,
            }),
            Err(e) if e.is_unique_violation() => {
                // A concurrent scan for the same voter committed first.
                debug!(voter_id = %voter_id, "[tps-04] Concurrent scan won, re-reading");
                let mut tx = self.store.begin().await?;
                let existing = tx
                    .latest_checkin(election_id, voter_id, &NON_TERMINAL)
                    .await?
                    .ok_or_else(|| TpsError::Internal("active check-in vanished".into()))?;
                Ok(ScanCommit {
                    outcome: ScanOutcome {
                        checkin: existing,
                        created: false,
                    },
                    voter: None,
                    lapsed: None,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    // -------------------------------------------------------------------------
    // Approve / reject
    // -------------------------------------------------------------------------

    async fn decide_in_tx(
        &self,
        operator_id: OperatorId,
        station_id: StationId,
        checkin_id: CheckinId,
        decision: Decision,
        now: DateTime<Utc>,
    ) -> Result<Checkin, TpsError> {
        let operator = self.guard.resolve_operator(operator_id).await?;
        let mut tx = self.store.begin().await?;

        let station = self
            .guard
            .ensure_station_access(tx.as_mut(), station_id, &operator)
            .await?;

        let checkin = tx
            .lock_checkin(checkin_id)
            .await?
            .ok_or(TpsError::CheckinNotFound)?;
        if checkin.station_id != station_id {
            warn!(
                operator_id = %operator_id,
                station_id = %station_id,
                checkin_id = %checkin_id,
                "[tps-04] Check-in belongs to another station"
            );
            return Err(TpsError::AccessDenied);
        }
        check_pairing(&station, checkin.election_id)?;

        let decided = match decision {
            Decision::Approve => {
                if checkin.status != CheckinStatus::Pending {
                    return Err(TpsError::CheckinNotPending {
                        status: checkin.status,
                    });
                }
                self.ensure_station_accepting(&station, now)?;
                Self::ensure_election_open(tx.as_mut(), checkin.election_id, now).await?;
                Self::ensure_not_voted(tx.as_mut(), checkin.election_id, checkin.voter_id)
                    .await?;
                let window = self.config.approval_window().ok_or_else(|| {
                    TpsError::Internal("approval window out of range".into())
                })?;
                transitions::approve(checkin, operator_id, now, window)?
            }
            Decision::Reject(reason) => transitions::reject(checkin, operator_id, reason)?,
        };

        tx.update_checkin(decided.clone()).await?;
        tx.commit().await?;
        Ok(decided)
    }

    async fn decide(
        &self,
        operator_id: OperatorId,
        station_id: StationId,
        checkin_id: CheckinId,
        decision: Decision,
    ) -> Result<Checkin, TpsError> {
        let now = self.time.now();
        let (op, action) = match &decision {
            Decision::Approve => ("approve", AuditAction::CheckinApproved),
            Decision::Reject(_) => ("reject", AuditAction::CheckinRejected),
        };

        let checkin = with_timeout(
            self.config.transaction_timeout(),
            op,
            self.decide_in_tx(operator_id, station_id, checkin_id, decision, now),
        )
        .await?;

        info!(
            checkin_id = %checkin.id,
            station_id = %station_id,
            operator_id = %operator_id,
            status = %checkin.status,
            "[tps-04] Check-in decided"
        );

        self.publisher.publish(StationEvent::CheckinUpdated {
            checkin_id: checkin.id,
            station_id,
            new_status: checkin.status,
            updated_at: now,
        });
        record_best_effort(
            self.audit.as_ref(),
            AuditEntry::new(action, now)
                .election(checkin.election_id)
                .station(station_id)
                .checkin(checkin.id)
                .operator(operator_id)
                .details(json!({
                    "expires_at": checkin.expires_at,
                    "reason": checkin.rejection_reason,
                })),
        )
        .await;

        Ok(checkin)
    }

    async fn eligibility_in_tx(
        &self,
        voter_id: VoterId,
        election_id: ElectionId,
        now: DateTime<Utc>,
    ) -> Result<Eligibility, TpsError> {
        let mut tx = self.store.begin().await?;

        let on_roll = tx.voter(voter_id).await?.is_some_and(|v| v.eligible);
        let status = tx.voter_status(election_id, voter_id).await?;
        let active_checkin = tx
            .latest_checkin(election_id, voter_id, &NON_TERMINAL)
            .await?
            .filter(|c| c.is_active_at(now));

        Ok(Eligibility {
            voter_id,
            election_id,
            eligible: on_roll && status.is_some(),
            has_voted: status.as_ref().is_some_and(|s| s.has_voted),
            voted_at: status.and_then(|s| s.voted_at),
            active_checkin,
        })
    }
}

#[async_trait]
impl CheckinApi for CheckinService {
    async fn scan(&self, voter_id: VoterId, payload: &str) -> Result<ScanOutcome, TpsError> {
        let now = self.time.now();
        let commit = with_timeout(
            self.config.transaction_timeout(),
            "scan",
            self.scan_in_tx(voter_id, payload, now),
        )
        .await
        .map_err(|e| {
            debug!(voter_id = %voter_id, code = e.code(), "[tps-04] Scan refused");
            e
        })?;

        if let Some(lapsed) = &commit.lapsed {
            self.publisher.publish(StationEvent::CheckinUpdated {
                checkin_id: lapsed.id,
                station_id: lapsed.station_id,
                new_status: CheckinStatus::Expired,
                updated_at: now,
            });
        }

        let checkin = &commit.outcome.checkin;
        if let Some(voter) = commit.voter {
            info!(
                checkin_id = %checkin.id,
                station_id = %checkin.station_id,
                voter_id = %voter_id,
                "[tps-04] Voter checked in"
            );
            self.publisher.publish(StationEvent::CheckinNew {
                checkin_id: checkin.id,
                station_id: checkin.station_id,
                voter,
                scanned_at: checkin.scanned_at,
            });
            record_best_effort(
                self.audit.as_ref(),
                AuditEntry::new(AuditAction::CheckinScanned, now)
                    .election(checkin.election_id)
                    .station(checkin.station_id)
                    .checkin(checkin.id),
            )
            .await;
        }

        Ok(commit.outcome)
    }

    async fn approve(
        &self,
        operator_id: OperatorId,
        station_id: StationId,
        checkin_id: CheckinId,
    ) -> Result<Checkin, TpsError> {
        self.decide(operator_id, station_id, checkin_id, Decision::Approve)
            .await
    }

    async fn reject(
        &self,
        operator_id: OperatorId,
        station_id: StationId,
        checkin_id: CheckinId,
        reason: Option<String>,
    ) -> Result<Checkin, TpsError> {
        self.decide(operator_id, station_id, checkin_id, Decision::Reject(reason))
            .await
    }

    async fn get_eligibility(
        &self,
        voter_id: VoterId,
        election_id: ElectionId,
    ) -> Result<Eligibility, TpsError> {
        let now = self.time.now();
        with_timeout(
            self.config.transaction_timeout(),
            "get_eligibility",
            self.eligibility_in_tx(voter_id, election_id, now),
        )
        .await
    }
}
