//! Configuration for QR rotation

use serde::{Deserialize, Serialize};

/// QR rotation configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QrConfig {
    /// Execution budget for one rotation transaction (milliseconds)
    pub transaction_timeout_ms: u64,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            transaction_timeout_ms: 5000,
        }
    }
}
