//! # Vote-Cast Subsystem
//!
//! **Subsystem ID:** 5
//!
//! ## Purpose
//!
//! Turns an APPROVED, unexpired check-in into exactly one recorded ballot.
//!
//! ## Exactly-Once Guarantee
//!
//! | Guarantee | Enforcement |
//! |-----------|-------------|
//! | At most one vote per (election, voter) | VoterStatus row lock + `has_voted` check inside the write transaction |
//! | No vote without the `has_voted` flip, and vice versa | Both written in the same transaction |
//! | Expired approvals never vote | `expires_at` compared to now, independent of the sweep |
//! | Check-in consumed once | Check-in row locked and re-checked before it is marked VOTED |
//!
//! Competing calls for the same voter are totally ordered by the VoterStatus
//! lock; every loser observes `ALREADY_VOTED`.

#![warn(clippy::all)]

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::VoteCastService;
pub use config::VoteCastConfig;
pub use domain::{ReceiptHasher, VoteReceipt};
pub use ports::VoteCastApi;
