//! Configuration for the check-in subsystem

use chrono::{Duration, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration as StdDuration;

/// Longest approval window the runtime accepts (one day).
pub const MAX_APPROVAL_WINDOW_SECS: u64 = 24 * 60 * 60;

/// Check-in configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckinConfig {
    /// How long an approval stays valid (seconds, wall-clock UTC)
    pub approval_window_secs: u64,
    /// Execution budget for one check-in transaction (milliseconds)
    pub transaction_timeout_ms: u64,
    /// Reject scans and approvals outside the station's date/hours
    pub enforce_station_hours: bool,
    /// UTC offset the station's date and hours are expressed in (minutes)
    pub station_utc_offset_minutes: i32,
}

impl Default for CheckinConfig {
    fn default() -> Self {
        Self {
            approval_window_secs: 15 * 60,
            transaction_timeout_ms: 5000,
            enforce_station_hours: true,
            // WIB
            station_utc_offset_minutes: 7 * 60,
        }
    }
}

impl CheckinConfig {
    /// `None` when the configured seconds do not fit a `chrono::Duration`.
    pub fn approval_window(&self) -> Option<Duration> {
        i64::try_from(self.approval_window_secs)
            .ok()
            .and_then(Duration::try_seconds)
    }

    pub fn transaction_timeout(&self) -> StdDuration {
        StdDuration::from_millis(self.transaction_timeout_ms)
    }

    /// Falls back to UTC when the configured offset is out of range.
    pub fn station_offset(&self) -> FixedOffset {
        self.station_utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}

/// Expiry sweep configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Seconds between sweeps
    pub interval_secs: u64,
    /// Run the sweep at all
    pub enabled: bool,
    /// Maximum check-ins expired per sweep
    pub batch_size: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            enabled: true,
            batch_size: 500,
        }
    }
}
