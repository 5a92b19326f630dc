//! Application layer for vote casting

pub mod service;

pub use service::VoteCastService;
