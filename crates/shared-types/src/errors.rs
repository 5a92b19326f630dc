//! # Error Types
//!
//! The error taxonomy surfaced by every public TPS operation.
//!
//! Domain errors abort and roll back the enclosing transaction and must not
//! be retried. `Internal` covers infrastructure failures (store unavailable,
//! transaction timeout) and is the only retryable kind.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::CheckinStatus;

/// Errors returned by TPS operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TpsError {
    #[error("QR code is not valid")]
    QrInvalid,

    #[error("QR code has been revoked")]
    QrRevoked,

    #[error("station not found")]
    StationNotFound,

    #[error("station is not active")]
    StationInactive,

    #[error("station is closed")]
    StationClosed,

    #[error("election is not open for voting")]
    ElectionNotOpen,

    #[error("voter is not eligible for this election")]
    NotEligible,

    #[error("voter has already voted in this election")]
    AlreadyVoted,

    #[error("no approved check-in for this voter")]
    NoApprovedCheckin,

    #[error("check-in approval has expired")]
    CheckinExpired,

    #[error("check-in not found")]
    CheckinNotFound,

    #[error("check-in is {status}, expected PENDING")]
    CheckinNotPending { status: CheckinStatus },

    #[error("candidate does not belong to this election")]
    InvalidCandidate,

    #[error("operator is not allowed to act on this station")]
    AccessDenied,

    #[error("station does not belong to this election")]
    StationMismatch,

    /// Infrastructure failure. Safe to retry.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Fieldless mirror of [`TpsError`] used for transport mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    QrInvalid,
    QrRevoked,
    StationNotFound,
    StationInactive,
    StationClosed,
    ElectionNotOpen,
    NotEligible,
    AlreadyVoted,
    NoApprovedCheckin,
    CheckinExpired,
    CheckinNotFound,
    CheckinNotPending,
    InvalidCandidate,
    AccessDenied,
    StationMismatch,
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::QrInvalid => "QR_INVALID",
            Self::QrRevoked => "QR_REVOKED",
            Self::StationNotFound => "STATION_NOT_FOUND",
            Self::StationInactive => "STATION_INACTIVE",
            Self::StationClosed => "STATION_CLOSED",
            Self::ElectionNotOpen => "ELECTION_NOT_OPEN",
            Self::NotEligible => "NOT_ELIGIBLE",
            Self::AlreadyVoted => "ALREADY_VOTED",
            Self::NoApprovedCheckin => "NO_APPROVED_CHECKIN",
            Self::CheckinExpired => "CHECKIN_EXPIRED",
            Self::CheckinNotFound => "CHECKIN_NOT_FOUND",
            Self::CheckinNotPending => "CHECKIN_NOT_PENDING",
            Self::InvalidCandidate => "INVALID_CANDIDATE",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::StationMismatch => "STATION_MISMATCH",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    /// HTTP status a transport layer should answer with.
    pub const fn http_status(self) -> u16 {
        match self {
            Self::QrInvalid | Self::InvalidCandidate | Self::StationMismatch => 400,
            Self::AccessDenied | Self::NotEligible => 403,
            Self::StationNotFound | Self::CheckinNotFound | Self::NoApprovedCheckin => 404,
            Self::AlreadyVoted | Self::CheckinNotPending => 409,
            Self::QrRevoked | Self::CheckinExpired => 410,
            Self::StationInactive | Self::StationClosed | Self::ElectionNotOpen => 422,
            Self::Internal => 500,
        }
    }
}

impl TpsError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::QrInvalid => ErrorKind::QrInvalid,
            Self::QrRevoked => ErrorKind::QrRevoked,
            Self::StationNotFound => ErrorKind::StationNotFound,
            Self::StationInactive => ErrorKind::StationInactive,
            Self::StationClosed => ErrorKind::StationClosed,
            Self::ElectionNotOpen => ErrorKind::ElectionNotOpen,
            Self::NotEligible => ErrorKind::NotEligible,
            Self::AlreadyVoted => ErrorKind::AlreadyVoted,
            Self::NoApprovedCheckin => ErrorKind::NoApprovedCheckin,
            Self::CheckinExpired => ErrorKind::CheckinExpired,
            Self::CheckinNotFound => ErrorKind::CheckinNotFound,
            Self::CheckinNotPending { .. } => ErrorKind::CheckinNotPending,
            Self::InvalidCandidate => ErrorKind::InvalidCandidate,
            Self::AccessDenied => ErrorKind::AccessDenied,
            Self::StationMismatch => ErrorKind::StationMismatch,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub const fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Only infrastructure failures may be retried automatically.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Internal(_))
    }

    /// Transport-ready body: `{code, message}`.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

/// Serializable error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}
