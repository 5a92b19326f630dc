//! # TPS Runtime
//!
//! Wires the TPS voting core together and owns its background tasks.
//!
//! ## Modular Structure
//!
//! - `container/` - Service container and runtime configuration
//! - `sweep` - Periodic expiry sweep task
//!
//! ## Event Flow
//!
//! ```text
//! scan ──→ CheckinService(4) ──CHECKIN_NEW──────────┐
//! approve/reject ──→ CheckinService(4) ──UPDATED──→ ├──→ Hub(2) ──→ station:{id}
//! castVote ──→ VoteCastService(5) ──UPDATED(VOTED)─→ │
//! sweep ──→ ExpirySweeper(4) ──UPDATED(EXPIRED)─────┘
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults + `TPS_*` environment)
//! 2. Validate the receipt HMAC key is not default
//! 3. Build the service container and spawn the hub actor
//! 4. Spawn the expiry sweep
//! 5. Signal ready

#![warn(clippy::all)]

pub mod container;
pub mod sweep;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;
use shared_types::TimeSource;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub use container::{load_config, ConfigError, RuntimeConfig, ServiceContainer};
pub use sweep::run_expiry_sweep;

/// How long shutdown waits for background tasks to finish.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// The runtime orchestrating all TPS services.
pub struct TpsRuntime {
    container: Arc<ServiceContainer>,
    hub_task: Mutex<Option<JoinHandle<()>>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl TpsRuntime {
    /// Create the runtime against the system clock.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let (container, hub_task) = ServiceContainer::new(config)?;
        Ok(Self::from_container(container, hub_task))
    }

    /// Create the runtime against a caller-provided clock.
    pub fn with_time_source(config: RuntimeConfig, time: Arc<dyn TimeSource>) -> Result<Self> {
        let (container, hub_task) = ServiceContainer::with_time_source(config, time)?;
        Ok(Self::from_container(container, hub_task))
    }

    fn from_container(container: ServiceContainer, hub_task: JoinHandle<()>) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            container: Arc::new(container),
            hub_task: Mutex::new(Some(hub_task)),
            tasks: Mutex::new(Vec::new()),
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Start background tasks.
    pub async fn start(&self) -> Result<()> {
        info!("===========================================");
        info!("  TPS Voting Core Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let sweep = &self.container.config.sweep;
        if sweep.enabled {
            let task = tokio::spawn(run_expiry_sweep(
                Arc::clone(&self.container.sweeper),
                Duration::from_secs(sweep.interval_secs),
                self.shutdown_rx.clone(),
            ));
            self.tasks.lock().push(task);
            info!(interval_secs = sweep.interval_secs, "[tps-04] Expiry sweep started");
        } else {
            warn!("[tps-04] Expiry sweep disabled; lapsed approvals are only expired lazily");
        }

        info!("All TPS services initialized and running");
        Ok(())
    }

    /// Shutdown gracefully.
    ///
    /// 1. Signal shutdown to background tasks
    /// 2. Wait for them (bounded)
    /// 3. Stop the hub actor
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let tasks: Vec<_> = self.tasks.lock().drain(..).collect();
        for task in tasks {
            match tokio::time::timeout(SHUTDOWN_GRACE, task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "Background task ended abnormally"),
                Err(_) => warn!("Background task did not stop within grace period"),
            }
        }

        if let Some(hub_task) = self.hub_task.lock().take() {
            hub_task.abort();
            info!("[tps-02] Notification hub stopped");
        }

        info!("Shutdown complete");
    }

    /// Get a reference to the service container.
    pub fn container(&self) -> Arc<ServiceContainer> {
        Arc::clone(&self.container)
    }
}
