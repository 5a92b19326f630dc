//! Store adapters.

pub mod audit;
pub mod locks;
pub mod memory;

pub use audit::{MemoryAuditSink, TracingAuditSink};
pub use locks::RowKey;
pub use memory::{MemoryStore, MemoryTransaction};
