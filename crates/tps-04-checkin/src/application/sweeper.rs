//! # Expiry Sweep
//!
//! Moves APPROVED check-ins whose window has elapsed to EXPIRED. Hygiene
//! only: the vote-cast engine compares timestamps itself and never relies on
//! the sweep having run.

use shared_types::{CheckinId, CheckinStatus, StationEvent, TimeSource, TpsError};
use std::sync::Arc;
use tps_02_notification_hub::EventPublisher;
use tps_store::{record_best_effort, AuditAction, AuditEntry, AuditSink, TransactionalStore};
use tracing::{debug, info, warn};

use crate::config::SweepConfig;
use crate::domain::transitions;

pub struct ExpirySweeper {
    store: Arc<dyn TransactionalStore>,
    publisher: Arc<dyn EventPublisher>,
    audit: Arc<dyn AuditSink>,
    time: Arc<dyn TimeSource>,
    batch_size: usize,
}

impl ExpirySweeper {
    pub fn new(
        store: Arc<dyn TransactionalStore>,
        publisher: Arc<dyn EventPublisher>,
        audit: Arc<dyn AuditSink>,
        time: Arc<dyn TimeSource>,
        config: &SweepConfig,
    ) -> Self {
        Self {
            store,
            publisher,
            audit,
            time,
            batch_size: config.batch_size.max(1),
        }
    }

    /// Expire every lapsed approval found now. Returns how many were expired.
    ///
    /// Each check-in is expired in its own transaction under its row lock, so
    /// a concurrent vote either commits first (row is VOTED, skipped) or
    /// waits and then sees EXPIRED.
    pub async fn sweep_once(&self) -> Result<usize, TpsError> {
        let now = self.time.now();
        let candidates = {
            let mut tx = self.store.begin().await?;
            tx.lapsed_approvals(now, self.batch_size).await?
        };
        if candidates.is_empty() {
            return Ok(0);
        }
        debug!(candidates = candidates.len(), "[tps-04] Sweeping lapsed approvals");

        let mut expired = 0;
        for checkin_id in candidates {
            match self.expire_one(checkin_id, now).await {
                Ok(true) => expired += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(checkin_id = %checkin_id, error = %e, "[tps-04] Failed to expire check-in");
                }
            }
        }

        if expired > 0 {
            info!(expired, "[tps-04] Expired lapsed approvals");
        }
        Ok(expired)
    }

    async fn expire_one(
        &self,
        checkin_id: CheckinId,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<bool, TpsError> {
        let mut tx = self.store.begin().await?;
        let Some(checkin) = tx.lock_checkin(checkin_id).await? else {
            return Ok(false);
        };
        let Some(checkin) = transitions::expire(checkin, now) else {
            return Ok(false);
        };
        tx.update_checkin(checkin.clone()).await?;
        tx.commit().await?;

        self.publisher.publish(StationEvent::CheckinUpdated {
            checkin_id,
            station_id: checkin.station_id,
            new_status: CheckinStatus::Expired,
            updated_at: now,
        });
        record_best_effort(
            self.audit.as_ref(),
            AuditEntry::new(AuditAction::CheckinExpired, now)
                .election(checkin.election_id)
                .station(checkin.station_id)
                .checkin(checkin_id),
        )
        .await;
        Ok(true)
    }
}
