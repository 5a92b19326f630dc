//! Ports module for check-ins

pub mod inbound;

pub use inbound::{CheckinApi, ScanOutcome};
