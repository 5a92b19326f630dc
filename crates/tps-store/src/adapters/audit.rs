//! Audit sink adapters.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

use crate::ports::audit::{AuditEntry, AuditError, AuditSink};

/// Writes each entry as a structured JSON log line on the `tps::audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        let line = serde_json::to_string(&entry).map_err(|e| AuditError(e.to_string()))?;
        info!(target: "tps::audit", "{}", line);
        Ok(())
    }
}

/// Keeps entries in memory. Can be switched into a failing mode.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
    failing: AtomicBool,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AuditError("sink offline".into()));
        }
        self.entries.lock().push(entry);
        Ok(())
    }
}
