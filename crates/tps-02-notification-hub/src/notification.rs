//! Transport envelope for station events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{StationEvent, StationId};

/// JSON message pushed to an operator client.
///
/// ```json
/// {"channel":"station:<id>","event":{"type":"CHECKIN_NEW",...},"sent_at":"..."}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationNotification {
    pub channel: String,
    pub event: StationEvent,
    pub sent_at: DateTime<Utc>,
}

impl StationNotification {
    pub fn new(event: StationEvent, sent_at: DateTime<Utc>) -> Self {
        Self {
            channel: channel_name(event.station_id()),
            event,
            sent_at,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Channel name a station's operators listen on.
pub fn channel_name(station_id: StationId) -> String {
    format!("station:{station_id}")
}
