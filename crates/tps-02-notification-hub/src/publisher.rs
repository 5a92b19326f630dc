//! # Event Publisher
//!
//! The side the check-in and vote-cast services see. Publishing is
//! fire-and-forget: it never waits on the hub or on any subscriber.

use shared_types::StationEvent;

/// Sink for station lifecycle events.
pub trait EventPublisher: Send + Sync {
    /// Hand an event to the hub.
    ///
    /// Returns `false` if the event was dropped before reaching the hub
    /// (command queue full or hub stopped).
    fn publish(&self, event: StationEvent) -> bool;

    /// Events accepted for fan-out so far.
    fn events_published(&self) -> u64;
}
