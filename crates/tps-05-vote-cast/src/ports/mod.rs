//! Ports module for vote casting

pub mod inbound;

pub use inbound::VoteCastApi;
