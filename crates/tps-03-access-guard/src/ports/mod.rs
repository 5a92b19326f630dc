//! Ports module for the access guard

pub mod outbound;

pub use outbound::OperatorDirectory;
