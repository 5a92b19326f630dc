//! Audit log port.
//!
//! Audit writes happen after the primary transaction has committed and are
//! best-effort: a failing sink is logged and ignored.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{CheckinId, ElectionId, OperatorId, StationId};
use thiserror::Error;
use tracing::warn;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    CheckinScanned,
    CheckinApproved,
    CheckinRejected,
    CheckinExpired,
    VoteCast,
    QrRotated,
}

/// One audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub action: AuditAction,
    pub election_id: Option<ElectionId>,
    pub station_id: Option<StationId>,
    pub checkin_id: Option<CheckinId>,
    pub operator_id: Option<OperatorId>,
    pub at: DateTime<Utc>,
    #[serde(default)]
    pub details: serde_json::Value,
}

impl AuditEntry {
    pub fn new(action: AuditAction, at: DateTime<Utc>) -> Self {
        Self {
            action,
            election_id: None,
            station_id: None,
            checkin_id: None,
            operator_id: None,
            at,
            details: serde_json::Value::Null,
        }
    }

    pub fn election(mut self, id: ElectionId) -> Self {
        self.election_id = Some(id);
        self
    }

    pub fn station(mut self, id: StationId) -> Self {
        self.station_id = Some(id);
        self
    }

    pub fn checkin(mut self, id: CheckinId) -> Self {
        self.checkin_id = Some(id);
        self
    }

    pub fn operator(mut self, id: OperatorId) -> Self {
        self.operator_id = Some(id);
        self
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("audit write failed: {0}")]
pub struct AuditError(pub String);

/// Destination for audit records.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: AuditEntry) -> Result<(), AuditError>;
}

/// Record an entry, swallowing sink failures.
pub async fn record_best_effort(sink: &dyn AuditSink, entry: AuditEntry) {
    let action = entry.action;
    if let Err(e) = sink.record(entry).await {
        warn!(action = ?action, error = %e, "Audit entry dropped");
    }
}
