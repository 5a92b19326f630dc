//! # Notification Hub Subsystem
//!
//! **Subsystem ID:** 2
//!
//! Real-time fan-out of check-in lifecycle events to the operators of a
//! station. At-most-once and best-effort: no persistence, no replay, and a
//! subscriber that stops reading is disconnected.
//!
//! ## Commands
//!
//! | Command | Sender | Effect |
//! |---------|--------|--------|
//! | `Subscribe` | `HubHandle::subscribe` | Register a bounded buffer for a station |
//! | `Unsubscribe` | `Subscription` drop | Remove the buffer |
//! | `Publish` | `EventPublisher::publish` | `try_send` to every buffer of the station |
//! | `Stats` | `HubHandle::stats` | Counter snapshot |
//!
//! ## Events
//!
//! - `CHECKIN_NEW { checkin_id, voter, scanned_at }`
//! - `CHECKIN_UPDATED { checkin_id, new_status }`

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod actor;
pub mod config;
pub mod handle;
pub mod notification;
pub mod publisher;
pub mod subscriber;

pub use actor::{HubStats, SubscriptionId};
pub use config::HubConfig;
pub use handle::{HubError, HubHandle};
pub use notification::{channel_name, StationNotification};
pub use publisher::EventPublisher;
pub use subscriber::{EventStream, Subscription, SubscriptionError};
