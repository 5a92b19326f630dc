//! # Station Subscriptions
//!
//! A subscription receives every event for one station until it is dropped,
//! the hub removes it for stalling, or the hub stops.

use shared_types::{StationEvent, StationId};
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::Stream;
use tracing::debug;

use crate::actor::{HubCommand, SubscriptionId};

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The hub stopped or removed this subscriber.
    #[error("Subscription closed")]
    Closed,
}

/// Handle for receiving one station's events.
///
/// Dropping it unregisters from the hub.
pub struct Subscription {
    id: SubscriptionId,
    station_id: StationId,
    receiver: mpsc::Receiver<StationEvent>,
    commands: mpsc::Sender<HubCommand>,
}

impl Subscription {
    pub(crate) fn new(
        id: SubscriptionId,
        station_id: StationId,
        receiver: mpsc::Receiver<StationEvent>,
        commands: mpsc::Sender<HubCommand>,
    ) -> Self {
        Self {
            id,
            station_id,
            receiver,
            commands,
        }
    }

    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    #[must_use]
    pub fn station_id(&self) -> StationId {
        self.station_id
    }

    /// Next event, or `None` once the subscription is closed and drained.
    pub async fn recv(&mut self) -> Option<StationEvent> {
        self.receiver.recv().await
    }

    /// Next buffered event without waiting.
    pub fn try_recv(&mut self) -> Result<Option<StationEvent>, SubscriptionError> {
        match self.receiver.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => Err(SubscriptionError::Closed),
        }
    }

    /// Explicit unsubscribe; equivalent to dropping the handle.
    ///
    /// Best-effort: when the hub's command queue is full the request is
    /// lost, and the actor removes the closed subscriber on the next
    /// publish to this station instead.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // A full or closed command queue is fine: the actor prunes the dead
        // sender on the next publish to this station.
        let _ = self.commands.try_send(HubCommand::Unsubscribe {
            station_id: self.station_id,
            id: self.id,
        });
        debug!(station_id = %self.station_id, subscription = %self.id, "Subscription dropped");
    }
}

/// `Stream` adapter over a subscription.
pub struct EventStream {
    subscription: Subscription,
}

impl EventStream {
    #[must_use]
    pub fn new(subscription: Subscription) -> Self {
        Self { subscription }
    }

    #[must_use]
    pub fn station_id(&self) -> StationId {
        self.subscription.station_id()
    }
}

impl Stream for EventStream {
    type Item = StationEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.subscription.receiver.poll_recv(cx)
    }
}
