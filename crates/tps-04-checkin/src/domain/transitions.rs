//! # Check-in Transitions
//!
//! Pure state-machine steps. Callers hold the check-in row lock.
//!
//! ```text
//! (none) ──scan──→ PENDING ──approve──→ APPROVED ──vote──→ VOTED
//!                     │                    │
//!                     └──reject──→ REJECTED └──expire──→ EXPIRED
//! ```
//!
//! APPROVED → VOTED belongs to the vote-cast engine and is not here.

use chrono::{DateTime, Duration, Utc};
use shared_types::{Checkin, CheckinStatus, OperatorId, TpsError};

fn require_pending(checkin: &Checkin) -> Result<(), TpsError> {
    if checkin.status != CheckinStatus::Pending {
        return Err(TpsError::CheckinNotPending {
            status: checkin.status,
        });
    }
    Ok(())
}

/// PENDING → APPROVED; the approval expires `window` after `now`.
///
/// A window that overflows the calendar is an `Internal` error.
pub fn approve(
    mut checkin: Checkin,
    operator_id: OperatorId,
    now: DateTime<Utc>,
    window: Duration,
) -> Result<Checkin, TpsError> {
    require_pending(&checkin)?;
    let expires_at = now
        .checked_add_signed(window)
        .ok_or_else(|| TpsError::Internal("approval window overflows".into()))?;
    checkin.status = CheckinStatus::Approved;
    checkin.approved_by = Some(operator_id);
    checkin.approved_at = Some(now);
    checkin.expires_at = Some(expires_at);
    Ok(checkin)
}

/// PENDING → REJECTED.
pub fn reject(
    mut checkin: Checkin,
    operator_id: OperatorId,
    reason: Option<String>,
) -> Result<Checkin, TpsError> {
    require_pending(&checkin)?;
    checkin.status = CheckinStatus::Rejected;
    checkin.approved_by = Some(operator_id);
    checkin.rejection_reason = reason.filter(|r| !r.trim().is_empty());
    Ok(checkin)
}

/// APPROVED → EXPIRED, only once the window has elapsed at `now`.
pub fn expire(mut checkin: Checkin, now: DateTime<Utc>) -> Option<Checkin> {
    if !checkin.is_expired_at(now) {
        return None;
    }
    checkin.status = CheckinStatus::Expired;
    Some(checkin)
}
