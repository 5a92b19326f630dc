//! Configuration for the notification hub

use serde::{Deserialize, Serialize};

/// Hub configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HubConfig {
    /// Events buffered per subscriber before it is considered stalled
    pub subscriber_capacity: usize,
    /// Commands buffered in front of the actor
    pub command_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            subscriber_capacity: 64,
            command_capacity: 1024,
        }
    }
}
