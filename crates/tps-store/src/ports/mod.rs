//! Ports module for the TPS store.
//!
//! Defines the transactional store and audit sink traits.

pub mod audit;
pub mod store;

pub use audit::{record_best_effort, AuditAction, AuditEntry, AuditError, AuditSink};
pub use store::{
    StoreTransaction, TransactionalStore, CHECKIN_ACTIVE_CONSTRAINT, STATION_QR_ACTIVE_CONSTRAINT,
};
