//! Periodic expiry sweep task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use tps_04_checkin::ExpirySweeper;

/// Run `sweep_once` every `interval` until the shutdown flag flips.
///
/// A failed sweep is logged; the next tick retries.
pub async fn run_expiry_sweep(
    sweeper: Arc<ExpirySweeper>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match sweeper.sweep_once().await {
                    Ok(0) => debug!("[tps-04] Expiry sweep found nothing to expire"),
                    Ok(expired) => info!(expired, "[tps-04] Expiry sweep completed"),
                    Err(e) => warn!(error = %e, "[tps-04] Expiry sweep failed"),
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("[tps-04] Shutdown signal received");
                    break;
                }
            }
        }
    }
}
