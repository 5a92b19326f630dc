//! # Access Guard Subsystem
//!
//! **Subsystem ID:** 3
//!
//! Authorizes a station operator against a station before the check-in
//! state machine acts on the operator's behalf. Station operators are bound
//! to exactly one station; platform administrators bypass the binding.

#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use adapters::InMemoryOperatorDirectory;
pub use application::guard::check_pairing;
pub use application::AccessGuard;
pub use domain::{OperatorContext, OperatorRole};
pub use ports::OperatorDirectory;
