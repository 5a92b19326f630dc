//! # Hub Handle
//!
//! Cloneable front for the hub actor.

use shared_types::{StationEvent, StationId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::actor::{HubActor, HubCommand, HubStats};
use crate::config::HubConfig;
use crate::publisher::EventPublisher;
use crate::subscriber::{EventStream, Subscription};

/// Errors from hub requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HubError {
    /// The actor has stopped.
    #[error("Notification hub stopped")]
    Stopped,
}

/// Cloneable handle to a running hub.
#[derive(Clone)]
pub struct HubHandle {
    commands: mpsc::Sender<HubCommand>,
    published: Arc<AtomicU64>,
}

impl HubHandle {
    /// Start the actor on the current runtime.
    ///
    /// The actor stops once every handle and subscription is dropped.
    pub fn spawn(config: &HubConfig) -> (Self, JoinHandle<()>) {
        let (commands, receiver) = mpsc::channel(config.command_capacity.max(1));
        let actor = HubActor::new(config.subscriber_capacity);
        let task = tokio::spawn(actor.run(receiver));
        (
            Self {
                commands,
                published: Arc::new(AtomicU64::new(0)),
            },
            task,
        )
    }

    /// Register for a station's events.
    pub async fn subscribe(&self, station_id: StationId) -> Result<Subscription, HubError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(HubCommand::Subscribe { station_id, reply })
            .await
            .map_err(|_| HubError::Stopped)?;
        let registered = response.await.map_err(|_| HubError::Stopped)?;
        Ok(Subscription::new(
            registered.id,
            station_id,
            registered.receiver,
            self.commands.clone(),
        ))
    }

    /// Register for a station's events as a `Stream`.
    pub async fn event_stream(&self, station_id: StationId) -> Result<EventStream, HubError> {
        Ok(EventStream::new(self.subscribe(station_id).await?))
    }

    /// Snapshot of the actor's counters.
    pub async fn stats(&self) -> Result<HubStats, HubError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(HubCommand::Stats { reply })
            .await
            .map_err(|_| HubError::Stopped)?;
        response.await.map_err(|_| HubError::Stopped)
    }
}

impl EventPublisher for HubHandle {
    fn publish(&self, event: StationEvent) -> bool {
        let event_type = event.event_type();
        let station_id = event.station_id();
        match self.commands.try_send(HubCommand::Publish { event }) {
            Ok(()) => {
                self.published.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(
                    station_id = %station_id,
                    event = event_type,
                    "[tps-02] Hub command queue full, event dropped"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!(
                    station_id = %station_id,
                    event = event_type,
                    "[tps-02] Hub stopped, event dropped"
                );
                false
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}
