//! Domain module for check-ins
//!
//! Pure transitions and admission rules. No I/O.

pub mod eligibility;
pub mod station;
pub mod transitions;

pub use eligibility::Eligibility;
pub use station::ensure_accepting;
