//! # TPS Voting Core Test Suite
//!
//! Unified test crate for flows that cross subsystem boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Runtime-backed world with seeded election data
//! └── integration/      # Cross-subsystem flows
//!     ├── scenario.rs   # Scan → approve → vote, end to end
//!     ├── concurrency.rs# Vote, scan and approve/reject races
//!     ├── rotation.rs   # QR rotation exclusivity
//!     ├── access.rs     # Operator station isolation
//!     ├── expiry.rs     # Approval window and sweep
//!     └── hub.rs        # Station event fan-out
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p tps-tests
//!
//! # By category
//! cargo test -p tps-tests integration::concurrency::
//!
//! # Benchmarks
//! cargo bench -p tps-tests
//! ```

#[cfg(test)]
pub mod fixtures;
pub mod integration;
