//! Configuration for the vote-cast engine

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Vote-cast configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoteCastConfig {
    /// Execution budget for one vote transaction (milliseconds)
    pub transaction_timeout_ms: u64,
    /// Key for hashing receipt tokens before they are stored
    pub receipt_hmac_key: [u8; 32],
}

impl Default for VoteCastConfig {
    fn default() -> Self {
        Self {
            transaction_timeout_ms: 5000,
            receipt_hmac_key: [0u8; 32],
        }
    }
}

impl VoteCastConfig {
    pub fn transaction_timeout(&self) -> Duration {
        Duration::from_millis(self.transaction_timeout_ms)
    }

    /// An all-zero key is the development default.
    pub fn has_default_key(&self) -> bool {
        self.receipt_hmac_key == [0u8; 32]
    }
}
