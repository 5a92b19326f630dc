//! Cross-subsystem integration flows.

pub mod access;
pub mod concurrency;
pub mod rotation;
pub mod scenario;
