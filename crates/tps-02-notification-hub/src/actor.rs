//! # Hub Actor
//!
//! Owns the per-station subscriber sets. Nothing else touches them; the
//! handle and subscriptions talk to the actor through a command channel.
//!
//! ```text
//! HubHandle ──Publish/Subscribe/Stats──→ ┌───────────┐ ──try_send──→ Subscription
//! Subscription ──Unsubscribe (drop)────→ │ HubActor  │ ──try_send──→ Subscription
//!                                        └───────────┘
//! ```
//!
//! Delivery uses `try_send`: a subscriber whose buffer is full or whose
//! receiver is gone is removed on the spot, so a stalled client never slows
//! the actor.

use serde::{Deserialize, Serialize};
use shared_types::{StationEvent, StationId};
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Hub-assigned subscription number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Counters reported by the actor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubStats {
    /// Stations with at least one subscriber
    pub stations: usize,
    /// Live subscribers across all stations
    pub subscribers: usize,
    /// Publish commands processed
    pub events_published: u64,
    /// Individual deliveries into subscriber buffers
    pub events_delivered: u64,
    /// Subscribers removed because they stalled or disconnected
    pub subscribers_dropped: u64,
}

pub(crate) struct Registered {
    pub id: SubscriptionId,
    pub receiver: mpsc::Receiver<StationEvent>,
}

pub(crate) enum HubCommand {
    Subscribe {
        station_id: StationId,
        reply: oneshot::Sender<Registered>,
    },
    Unsubscribe {
        station_id: StationId,
        id: SubscriptionId,
    },
    Publish {
        event: StationEvent,
    },
    Stats {
        reply: oneshot::Sender<HubStats>,
    },
}

pub(crate) struct HubActor {
    stations: HashMap<StationId, HashMap<SubscriptionId, mpsc::Sender<StationEvent>>>,
    subscriber_capacity: usize,
    next_id: u64,
    stats: HubStats,
}

impl HubActor {
    pub(crate) fn new(subscriber_capacity: usize) -> Self {
        Self {
            stations: HashMap::new(),
            subscriber_capacity: subscriber_capacity.max(1),
            next_id: 1,
            stats: HubStats::default(),
        }
    }

    /// Process commands until every sender is gone.
    pub(crate) async fn run(mut self, mut commands: mpsc::Receiver<HubCommand>) {
        info!("[tps-02] Notification hub started");
        while let Some(command) = commands.recv().await {
            self.handle(command);
        }
        info!(
            published = self.stats.events_published,
            dropped = self.stats.subscribers_dropped,
            "[tps-02] Notification hub stopped"
        );
    }

    fn handle(&mut self, command: HubCommand) {
        match command {
            HubCommand::Subscribe { station_id, reply } => {
                let registered = self.register(station_id);
                let id = registered.id;
                if reply.send(registered).is_err() {
                    // Caller went away before the reply arrived
                    self.unregister(station_id, id);
                }
            }
            HubCommand::Unsubscribe { station_id, id } => self.unregister(station_id, id),
            HubCommand::Publish { event } => self.publish(event),
            HubCommand::Stats { reply } => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    fn register(&mut self, station_id: StationId) -> Registered {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let (sender, receiver) = mpsc::channel(self.subscriber_capacity);
        self.stations
            .entry(station_id)
            .or_default()
            .insert(id, sender);
        debug!(station_id = %station_id, subscription = %id, "[tps-02] Subscriber registered");
        Registered { id, receiver }
    }

    fn unregister(&mut self, station_id: StationId, id: SubscriptionId) {
        let Some(subscribers) = self.stations.get_mut(&station_id) else {
            return;
        };
        if subscribers.remove(&id).is_some() {
            debug!(station_id = %station_id, subscription = %id, "[tps-02] Subscriber unregistered");
        }
        if subscribers.is_empty() {
            self.stations.remove(&station_id);
        }
    }

    fn publish(&mut self, event: StationEvent) {
        self.stats.events_published += 1;
        let station_id = event.station_id();

        let Some(subscribers) = self.stations.get_mut(&station_id) else {
            debug!(
                station_id = %station_id,
                event = event.event_type(),
                "[tps-02] No subscribers for station"
            );
            return;
        };

        let mut stale = Vec::new();
        for (id, sender) in subscribers.iter() {
            match sender.try_send(event.clone()) {
                Ok(()) => self.stats.events_delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(
                        station_id = %station_id,
                        subscription = %id,
                        "[tps-02] Subscriber stalled, dropping"
                    );
                    stale.push(*id);
                }
                Err(mpsc::error::TrySendError::Closed(_)) => stale.push(*id),
            }
        }

        for id in &stale {
            subscribers.remove(id);
        }
        self.stats.subscribers_dropped += stale.len() as u64;
        if subscribers.is_empty() {
            self.stations.remove(&station_id);
        }
    }

    fn snapshot(&self) -> HubStats {
        HubStats {
            stations: self.stations.len(),
            subscribers: self.stations.values().map(HashMap::len).sum(),
            ..self.stats.clone()
        }
    }
}
