//! Adapters for the access guard

pub mod memory;

pub use memory::InMemoryOperatorDirectory;
