//! # Station Events
//!
//! Events pushed to station operators through the notification hub.
//! Only successful transitions are ever published; errors stay with the
//! caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{CheckinStatus, Voter};
use crate::ids::{CheckinId, StationId, VoterId};

/// Voter details shown to the operator deciding on a check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterSummary {
    pub id: VoterId,
    pub identifier: String,
    pub name: String,
}

impl From<&Voter> for VoterSummary {
    fn from(voter: &Voter) -> Self {
        Self {
            id: voter.id,
            identifier: voter.identifier.clone(),
            name: voter.name.clone(),
        }
    }
}

/// Check-in lifecycle event for one station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StationEvent {
    /// A voter scanned the station QR and is waiting for approval.
    CheckinNew {
        checkin_id: CheckinId,
        station_id: StationId,
        voter: VoterSummary,
        scanned_at: DateTime<Utc>,
    },
    /// A check-in moved to a new status.
    CheckinUpdated {
        checkin_id: CheckinId,
        station_id: StationId,
        new_status: CheckinStatus,
        updated_at: DateTime<Utc>,
    },
}

impl StationEvent {
    pub fn station_id(&self) -> StationId {
        match self {
            Self::CheckinNew { station_id, .. } | Self::CheckinUpdated { station_id, .. } => {
                *station_id
            }
        }
    }

    pub fn checkin_id(&self) -> CheckinId {
        match self {
            Self::CheckinNew { checkin_id, .. } | Self::CheckinUpdated { checkin_id, .. } => {
                *checkin_id
            }
        }
    }

    /// Wire name of the event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::CheckinNew { .. } => "CHECKIN_NEW",
            Self::CheckinUpdated { .. } => "CHECKIN_UPDATED",
        }
    }
}
