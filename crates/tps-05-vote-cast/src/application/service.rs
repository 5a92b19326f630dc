//! Vote-Cast Service
//!
//! Implements `VoteCastApi`.
//!
//! ## Transaction
//!
//! 1. Election open
//! 2. Lock VoterStatus (election, voter); the serialization point
//! 3. `has_voted == false` under the lock
//! 4. Latest check-in for (election, voter) in any status
//! 5. It is APPROVED and its window is still open (timestamp comparison, not the sweep)
//! 6. Candidate belongs to the election
//! 7. Lock the check-in and re-check it is still APPROVED and unexpired
//! 8. Insert Vote (channel TPS) with the hashed receipt token
//! 9. Flip `has_voted`, record station and time
//! 10. Check-in → VOTED, commit
//!
//! Audit and broadcast happen only after commit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use shared_types::{
    CandidateId, Checkin, CheckinStatus, ElectionId, StationEvent, TimeSource, TpsError, Vote,
    VoteChannel, VoteId, VoterId, VotingMethod,
};
use std::sync::Arc;
use tps_02_notification_hub::EventPublisher;
use tps_store::{
    record_best_effort, with_timeout, AuditAction, AuditEntry, AuditSink, TransactionalStore,
};
use tracing::{debug, info};

use crate::config::VoteCastConfig;
use crate::domain::{generate_token, ReceiptError, ReceiptHasher, VoteReceipt};
use crate::ports::inbound::VoteCastApi;

const ANY_STATUS: [CheckinStatus; 5] = [
    CheckinStatus::Pending,
    CheckinStatus::Approved,
    CheckinStatus::Rejected,
    CheckinStatus::Voted,
    CheckinStatus::Expired,
];

/// What a committed vote produced.
struct CastCommit {
    receipt: VoteReceipt,
    vote_id: VoteId,
}

/// Vote-cast transaction engine
pub struct VoteCastService {
    store: Arc<dyn TransactionalStore>,
    publisher: Arc<dyn EventPublisher>,
    audit: Arc<dyn AuditSink>,
    time: Arc<dyn TimeSource>,
    hasher: ReceiptHasher,
    config: VoteCastConfig,
}

impl VoteCastService {
    pub fn new(
        store: Arc<dyn TransactionalStore>,
        publisher: Arc<dyn EventPublisher>,
        audit: Arc<dyn AuditSink>,
        time: Arc<dyn TimeSource>,
        config: VoteCastConfig,
    ) -> Result<Self, ReceiptError> {
        let hasher = ReceiptHasher::new(&config.receipt_hmac_key)?;
        Ok(Self {
            store,
            publisher,
            audit,
            time,
            hasher,
            config,
        })
    }

    /// The check-in must still be APPROVED and inside its window.
    fn ensure_consumable(checkin: &Checkin, now: DateTime<Utc>) -> Result<(), TpsError> {
        match checkin.status {
            CheckinStatus::Expired => Err(TpsError::CheckinExpired),
            CheckinStatus::Approved if checkin.is_expired_at(now) => Err(TpsError::CheckinExpired),
            CheckinStatus::Approved => Ok(()),
            _ => Err(TpsError::NoApprovedCheckin),
        }
    }

    async fn cast_in_tx(
        &self,
        voter_id: VoterId,
        election_id: ElectionId,
        candidate_id: CandidateId,
        now: DateTime<Utc>,
    ) -> Result<CastCommit, TpsError> {
        let mut tx = self.store.begin().await?;

        let open = tx
            .election(election_id)
            .await?
            .is_some_and(|election| election.is_voting_open_at(now));
        if !open {
            return Err(TpsError::ElectionNotOpen);
        }

        // Serialization point. A voter who already voted has no consumable
        // check-in left, so the flag is checked before the check-in lookup.
        let mut status = tx
            .lock_voter_status(election_id, voter_id)
            .await?
            .ok_or(TpsError::NotEligible)?;
        if status.has_voted {
            debug!(voter_id = %voter_id, "[tps-05] Lost vote race or repeat attempt");
            return Err(TpsError::AlreadyVoted);
        }

        // A newer PENDING or REJECTED row supersedes a stale approval.
        let latest = tx
            .latest_checkin(election_id, voter_id, &ANY_STATUS)
            .await?
            .ok_or(TpsError::NoApprovedCheckin)?;
        Self::ensure_consumable(&latest, now)?;

        if !tx.candidate_in_election(election_id, candidate_id).await? {
            return Err(TpsError::InvalidCandidate);
        }

        let mut checkin = tx
            .lock_checkin(latest.id)
            .await?
            .ok_or(TpsError::NoApprovedCheckin)?;
        Self::ensure_consumable(&checkin, now)?;

        let receipt_token = generate_token();
        let vote = Vote {
            id: VoteId::new(),
            election_id,
            candidate_id,
            token_hash: self.hasher.hash(&receipt_token),
            channel: VoteChannel::Tps,
            station_id: Some(checkin.station_id),
            cast_at: now,
        };
        let vote_id = vote.id;
        tx.insert_vote(vote).await?;

        status.has_voted = true;
        status.voted_at = Some(now);
        status.voting_method = Some(VotingMethod::Tps);
        status.tps_id = Some(checkin.station_id);
        tx.update_voter_status(status).await?;

        checkin.status = CheckinStatus::Voted;
        tx.update_checkin(checkin.clone()).await?;
        tx.commit().await?;

        Ok(CastCommit {
            receipt: VoteReceipt {
                receipt_token,
                election_id,
                station_id: checkin.station_id,
                checkin_id: checkin.id,
                cast_at: now,
            },
            vote_id,
        })
    }
}

#[async_trait]
impl VoteCastApi for VoteCastService {
    async fn cast_vote(
        &self,
        voter_id: VoterId,
        election_id: ElectionId,
        candidate_id: CandidateId,
    ) -> Result<VoteReceipt, TpsError> {
        let now = self.time.now();
        let CastCommit { receipt, vote_id } = with_timeout(
            self.config.transaction_timeout(),
            "cast_vote",
            self.cast_in_tx(voter_id, election_id, candidate_id, now),
        )
        .await?;

        info!(
            election_id = %election_id,
            station_id = %receipt.station_id,
            checkin_id = %receipt.checkin_id,
            "[tps-05] Vote recorded"
        );

        record_best_effort(
            self.audit.as_ref(),
            AuditEntry::new(AuditAction::VoteCast, now)
                .election(election_id)
                .station(receipt.station_id)
                .checkin(receipt.checkin_id)
                .details(json!({
                    "vote_id": vote_id,
                    "channel": VoteChannel::Tps,
                })),
        )
        .await;

        self.publisher.publish(StationEvent::CheckinUpdated {
            checkin_id: receipt.checkin_id,
            station_id: receipt.station_id,
            new_status: CheckinStatus::Voted,
            updated_at: now,
        });

        Ok(receipt)
    }
}
