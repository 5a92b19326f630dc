//! Operator identity as seen by the guard.

use serde::{Deserialize, Serialize};
use shared_types::{OperatorId, StationId};

/// What an operator account is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatorRole {
    /// Runs one station. Bound to it.
    StationOperator,
    /// Platform administrator. Not bound to any station.
    PlatformAdmin,
}

/// An authenticated operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorContext {
    pub operator_id: OperatorId,
    pub role: OperatorRole,
    /// Station the operator account is bound to, if any.
    pub station_binding: Option<StationId>,
}

impl OperatorContext {
    pub fn station_operator(operator_id: OperatorId, station_id: StationId) -> Self {
        Self {
            operator_id,
            role: OperatorRole::StationOperator,
            station_binding: Some(station_id),
        }
    }

    pub fn platform_admin(operator_id: OperatorId) -> Self {
        Self {
            operator_id,
            role: OperatorRole::PlatformAdmin,
            station_binding: None,
        }
    }

    /// Role/binding rule: admins go anywhere, operators only to their
    /// bound station.
    pub fn may_operate(&self, station_id: StationId) -> bool {
        match self.role {
            OperatorRole::PlatformAdmin => true,
            OperatorRole::StationOperator => self.station_binding == Some(station_id),
        }
    }
}
