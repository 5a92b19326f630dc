//! Store error types.

use shared_types::TpsError;
use thiserror::Error;

/// Infrastructure failures raised by a store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The transaction exceeded its execution budget and was rolled back.
    #[error("transaction timed out after {millis}ms")]
    Timeout { millis: u64 },

    /// A commit would violate a uniqueness constraint.
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: &'static str },

    /// Any other backend failure.
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }
}

impl From<StoreError> for TpsError {
    fn from(err: StoreError) -> Self {
        TpsError::Internal(err.to_string())
    }
}
