//! # Service Container
//!
//! Holds every subsystem service and the shared infrastructure they are
//! wired to.
//!
//! ## Initialization Order
//!
//! ```text
//! Phase 1: Store, audit sink, time source
//! Phase 2: Notification hub actor (tps-02)
//! Phase 3: Operator directory + access guard (tps-03)
//! Phase 4: QR rotation (tps-01), check-in (tps-04), vote cast (tps-05)
//! Phase 5: Expiry sweeper (tps-04)
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tracing::info;

use shared_types::{SystemTimeSource, TimeSource};
use tps_01_qr_codec::QrRotationService;
use tps_02_notification_hub::{EventPublisher, HubHandle};
use tps_03_access_guard::{AccessGuard, InMemoryOperatorDirectory};
use tps_04_checkin::{CheckinService, ExpirySweeper};
use tps_05_vote_cast::VoteCastService;
use tps_store::{AuditSink, MemoryStore, TracingAuditSink, TransactionalStore};

use crate::container::config::RuntimeConfig;

/// Central container holding all service instances.
pub struct ServiceContainer {
    /// Backing store. Exposed for admin-side seeding.
    pub store: MemoryStore,
    /// Notification hub handle; transport adapters subscribe here.
    pub hub: HubHandle,
    /// Operator directory behind the access guard.
    pub operators: Arc<InMemoryOperatorDirectory>,
    pub guard: Arc<AccessGuard>,
    pub qr_rotation: Arc<QrRotationService>,
    pub checkin: Arc<CheckinService>,
    pub vote_cast: Arc<VoteCastService>,
    pub sweeper: Arc<ExpirySweeper>,
    pub time: Arc<dyn TimeSource>,
    /// Configuration (immutable after initialization).
    pub config: RuntimeConfig,
}

impl ServiceContainer {
    /// Build the container against the system clock.
    ///
    /// Must be called inside a Tokio runtime; the hub actor is spawned here.
    pub fn new(config: RuntimeConfig) -> Result<(Self, JoinHandle<()>)> {
        Self::with_time_source(config, Arc::new(SystemTimeSource))
    }

    pub fn with_time_source(
        config: RuntimeConfig,
        time: Arc<dyn TimeSource>,
    ) -> Result<(Self, JoinHandle<()>)> {
        info!("Initializing TPS service container");

        info!("Phase 1: Creating shared infrastructure");
        let store = MemoryStore::new();
        let shared_store: Arc<dyn TransactionalStore> = Arc::new(store.clone());
        let audit: Arc<dyn AuditSink> = Arc::new(TracingAuditSink);

        info!("Phase 2: Starting notification hub");
        let (hub, hub_task) = HubHandle::spawn(&config.hub);
        let publisher: Arc<dyn EventPublisher> = Arc::new(hub.clone());
        info!("  [tps-02] Notification hub started");

        info!("Phase 3: Initializing access guard");
        let operators = Arc::new(InMemoryOperatorDirectory::new());
        let guard = Arc::new(AccessGuard::new(operators.clone()));
        info!("  [tps-03] Access guard initialized");

        info!("Phase 4: Initializing services");
        let qr_rotation = Arc::new(QrRotationService::new(
            Arc::clone(&shared_store),
            Arc::clone(&audit),
            Arc::clone(&time),
            config.qr.clone(),
        ));
        info!("  [tps-01] QR rotation initialized");

        let checkin = Arc::new(CheckinService::new(
            Arc::clone(&shared_store),
            Arc::clone(&guard),
            Arc::clone(&publisher),
            Arc::clone(&audit),
            Arc::clone(&time),
            config.checkin.clone(),
        ));
        info!(
            approval_window_secs = config.checkin.approval_window_secs,
            "  [tps-04] Check-in service initialized"
        );

        let vote_cast = match VoteCastService::new(
            Arc::clone(&shared_store),
            Arc::clone(&publisher),
            Arc::clone(&audit),
            Arc::clone(&time),
            config.vote_cast.clone(),
        ) {
            Ok(service) => Arc::new(service),
            Err(e) => {
                hub_task.abort();
                return Err(e).context("Failed to initialize vote-cast engine");
            }
        };
        info!("  [tps-05] Vote-cast engine initialized");

        info!("Phase 5: Initializing expiry sweeper");
        let sweeper = Arc::new(ExpirySweeper::new(
            shared_store,
            publisher,
            audit,
            Arc::clone(&time),
            &config.sweep,
        ));

        info!("Service container initialized");

        Ok((
            Self {
                store,
                hub,
                operators,
                guard,
                qr_rotation,
                checkin,
                vote_cast,
                sweeper,
                time,
                config,
            },
            hub_task,
        ))
    }
}
