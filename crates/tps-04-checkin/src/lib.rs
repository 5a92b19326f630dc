//! # Check-in Subsystem
//!
//! **Subsystem ID:** 4
//!
//! ## Purpose
//!
//! Governs the lifecycle of a voter's check-in at a station, from QR scan
//! through operator decision to consumption by the vote-cast engine or
//! expiry.
//!
//! ## State Machine
//!
//! ```text
//! (none) ──scan──→ [PENDING] ──approve──→ [APPROVED] ──cast_vote──→ [VOTED]
//!                      │                      │
//!                      └──reject──→ [REJECTED] └──window elapsed──→ [EXPIRED]
//! ```
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | At most one PENDING/APPROVED check-in per (election, voter) | scan returns the active one; store constraint `checkins_one_active_per_voter` at commit |
//! | Only PENDING check-ins are decided | `domain/transitions.rs` under the check-in row lock |
//! | Operators act only on their own station | `tps-03-access-guard` before the row is touched |
//! | Expiry never depends on the sweep | approval stores `expires_at`; readers compare timestamps |
//!
//! ## Outbound Dependencies
//!
//! | Crate | Trait | Purpose |
//! |-------|-------|---------|
//! | tps-store | `TransactionalStore`, `AuditSink` | Transactions, audit |
//! | tps-01-qr-codec | `resolve_payload` | Payload → station + active QR |
//! | tps-02-notification-hub | `EventPublisher` | `CHECKIN_NEW` / `CHECKIN_UPDATED` |
//! | tps-03-access-guard | `AccessGuard` | Operator ↔ station authorization |

#![warn(clippy::all)]

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod test_support;

pub use application::{CheckinService, ExpirySweeper};
pub use config::{CheckinConfig, SweepConfig, MAX_APPROVAL_WINDOW_SECS};
pub use domain::Eligibility;
pub use ports::{CheckinApi, ScanOutcome};
