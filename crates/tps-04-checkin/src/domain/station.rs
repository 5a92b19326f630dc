//! Station admission rules.

use chrono::{DateTime, FixedOffset, Utc};
use shared_types::{Station, StationStatus, TpsError};

/// Whether the station currently accepts check-ins.
///
/// | Station | Error |
/// |---------|-------|
/// | DRAFT | `StationInactive` |
/// | CLOSED | `StationClosed` |
/// | ACTIVE, outside date/hours (when enforced) | `StationClosed` |
pub fn ensure_accepting(
    station: &Station,
    now: DateTime<Utc>,
    offset: FixedOffset,
    enforce_hours: bool,
) -> Result<(), TpsError> {
    match station.status {
        StationStatus::Draft => Err(TpsError::StationInactive),
        StationStatus::Closed => Err(TpsError::StationClosed),
        StationStatus::Active if enforce_hours && !station.is_open_at(now, offset) => {
            Err(TpsError::StationClosed)
        }
        StationStatus::Active => Ok(()),
    }
}
