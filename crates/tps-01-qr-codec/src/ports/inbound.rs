//! Inbound Ports (Driving Ports / API)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{StationId, StationQr, TpsError};

/// Result of a rotation: the new active row and the payload to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotatedQr {
    pub qr: StationQr,
    pub payload: String,
    /// Number of previously active rows revoked by this rotation.
    pub revoked: usize,
}

/// Station QR administration API
#[async_trait]
pub trait QrRotationApi: Send + Sync {
    /// Issue a new secret for the station and revoke any active one,
    /// atomically.
    async fn rotate(&self, station_id: StationId) -> Result<RotatedQr, TpsError>;
}
