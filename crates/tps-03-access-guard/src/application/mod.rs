//! Application layer for the access guard

pub mod guard;

pub use guard::AccessGuard;
