//! Time source abstraction.
//!
//! Business timeouts (the approval window) are enforced by comparing
//! timestamps, so every service reads "now" through this trait and tests
//! drive it deterministically.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Source of the current wall-clock time (UTC).
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and simulations.
#[derive(Debug)]
pub struct ManualTimeSource {
    time: Mutex<DateTime<Utc>>,
}

impl ManualTimeSource {
    pub fn new(initial: DateTime<Utc>) -> Self {
        Self {
            time: Mutex::new(initial),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut time = self.time.lock();
        *time += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        let mut time = self.time.lock();
        *time = to;
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> DateTime<Utc> {
        *self.time.lock()
    }
}
