//! QR Rotation Service
//!
//! Issues a new station secret and revokes the previous one inside a single
//! transaction holding the station's QR set lock.

use async_trait::async_trait;
use serde_json::json;
use shared_types::{StationId, StationQr, StationQrId, TimeSource, TpsError};
use std::sync::Arc;
use std::time::Duration;
use tps_store::{
    record_best_effort, with_timeout, AuditAction, AuditEntry, AuditSink, TransactionalStore,
};
use tracing::{info, warn};

use crate::config::QrConfig;
use crate::domain::{generate_secret, QrPayload};
use crate::ports::inbound::{QrRotationApi, RotatedQr};

/// QR rotation service
pub struct QrRotationService {
    store: Arc<dyn TransactionalStore>,
    audit: Arc<dyn AuditSink>,
    time: Arc<dyn TimeSource>,
    config: QrConfig,
}

impl QrRotationService {
    pub fn new(
        store: Arc<dyn TransactionalStore>,
        audit: Arc<dyn AuditSink>,
        time: Arc<dyn TimeSource>,
        config: QrConfig,
    ) -> Self {
        Self {
            store,
            audit,
            time,
            config,
        }
    }

    async fn rotate_in_tx(&self, station_id: StationId) -> Result<RotatedQr, TpsError> {
        let mut tx = self.store.begin().await?;

        let station = tx
            .station(station_id)
            .await?
            .ok_or(TpsError::StationNotFound)?;

        let now = self.time.now();
        let mut revoked = 0;
        for mut qr in tx.lock_station_qrs(station_id).await? {
            if qr.active {
                qr.active = false;
                qr.revoked_at = Some(now);
                tx.update_station_qr(qr).await?;
                revoked += 1;
            }
        }

        let qr = StationQr {
            id: StationQrId::new(),
            station_id,
            secret: generate_secret(),
            active: true,
            revoked_at: None,
            created_at: now,
        };
        let payload = QrPayload::new(station.code.as_str(), qr.secret.as_str())?.encode();
        tx.insert_station_qr(qr.clone()).await?;

        tx.commit().await.map_err(|e| {
            warn!(station_id = %station_id, error = %e, "[tps-01] QR rotation commit failed");
            TpsError::from(e)
        })?;

        Ok(RotatedQr {
            qr,
            payload,
            revoked,
        })
    }
}

#[async_trait]
impl QrRotationApi for QrRotationService {
    async fn rotate(&self, station_id: StationId) -> Result<RotatedQr, TpsError> {
        let budget = Duration::from_millis(self.config.transaction_timeout_ms);
        let rotated = with_timeout(budget, "rotate_qr", self.rotate_in_tx(station_id)).await?;

        info!(
            station_id = %station_id,
            qr_id = %rotated.qr.id,
            revoked = rotated.revoked,
            "[tps-01] Station QR rotated"
        );

        record_best_effort(
            self.audit.as_ref(),
            AuditEntry::new(AuditAction::QrRotated, rotated.qr.created_at)
                .station(station_id)
                .details(json!({ "qr_id": rotated.qr.id, "revoked": rotated.revoked })),
        )
        .await;

        Ok(rotated)
    }
}
