//! # TPS Store
//!
//! Persistence boundary for the TPS core.
//!
//! ## Ports
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `TransactionalStore` / `StoreTransaction` | Row-locked transactions with commit-time constraints |
//! | `AuditSink` | Best-effort audit trail written after commit |
//!
//! ## Adapters
//!
//! - `MemoryStore`: in-process store with per-row async locks, buffered writes
//!   and partial-unique constraint checks at commit.
//! - `TracingAuditSink`: audit entries as JSON log lines.
//! - `MemoryAuditSink`: audit entries kept for inspection.

#![warn(clippy::all)]

pub mod adapters;
pub mod error;
pub mod ports;
pub mod timeout;

pub use adapters::{MemoryAuditSink, MemoryStore, MemoryTransaction, RowKey, TracingAuditSink};
pub use error::StoreError;
pub use ports::{
    record_best_effort, AuditAction, AuditEntry, AuditError, AuditSink, StoreTransaction,
    TransactionalStore, CHECKIN_ACTIVE_CONSTRAINT, STATION_QR_ACTIVE_CONSTRAINT,
};
pub use timeout::with_timeout;
