//! Application layer for check-ins

pub mod service;
pub mod sweeper;

pub use service::CheckinService;
pub use sweeper::ExpirySweeper;
