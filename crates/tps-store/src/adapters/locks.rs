//! Row lock table for the in-memory adapter.
//!
//! Each locked row maps to an async mutex. A transaction holds the owned
//! guard until it commits or rolls back, so waiters on the same row are
//! resumed one at a time in FIFO order.

use parking_lot::Mutex;
use shared_types::{CheckinId, ElectionId, StationId, VoterId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// A lockable row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKey {
    VoterStatus(ElectionId, VoterId),
    Checkin(CheckinId),
    StationQrs(StationId),
}

pub(crate) type RowGuard = OwnedMutexGuard<()>;

#[derive(Debug, Default)]
pub(crate) struct RowLocks {
    rows: Mutex<HashMap<RowKey, Arc<AsyncMutex<()>>>>,
}

impl RowLocks {
    /// Wait for the row lock.
    pub(crate) async fn acquire(&self, key: RowKey) -> RowGuard {
        let row = {
            let mut rows = self.rows.lock();
            Arc::clone(
                rows.entry(key)
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            )
        };
        row.lock_owned().await
    }

    /// Release a guard and forget the row if nobody else holds or waits on it.
    pub(crate) fn release(&self, key: RowKey, guard: RowGuard) {
        drop(guard);
        let mut rows = self.rows.lock();
        if rows.get(&key).is_some_and(|row| Arc::strong_count(row) == 1) {
            rows.remove(&key);
        }
    }

    pub(crate) fn tracked_rows(&self) -> usize {
        self.rows.lock().len()
    }
}
