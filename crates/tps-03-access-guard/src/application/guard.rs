//! # Access Guard
//!
//! Runs before any operator-driven state change.
//!
//! | Check | Error |
//! |-------|-------|
//! | operator unknown to the directory | `AccessDenied` |
//! | station does not exist | `StationNotFound` |
//! | operator not bound to the station (admins exempt) | `AccessDenied` |
//! | station serves a different election | `StationMismatch` |

use shared_types::{ElectionId, OperatorId, Station, StationId, TpsError};
use std::sync::Arc;
use tps_store::StoreTransaction;
use tracing::warn;

use crate::domain::OperatorContext;
use crate::ports::OperatorDirectory;

pub struct AccessGuard {
    directory: Arc<dyn OperatorDirectory>,
}

impl AccessGuard {
    pub fn new(directory: Arc<dyn OperatorDirectory>) -> Self {
        Self { directory }
    }

    /// Load the operator's role and binding.
    pub async fn resolve_operator(&self, operator_id: OperatorId) -> Result<OperatorContext, TpsError> {
        self.directory.operator(operator_id).await?.ok_or_else(|| {
            warn!(operator_id = %operator_id, "[tps-03] Unknown operator");
            TpsError::AccessDenied
        })
    }

    /// Authorize `operator` for `station_id` and return the station.
    pub async fn ensure_station_access(
        &self,
        tx: &mut dyn StoreTransaction,
        station_id: StationId,
        operator: &OperatorContext,
    ) -> Result<Station, TpsError> {
        let station = tx
            .station(station_id)
            .await?
            .ok_or(TpsError::StationNotFound)?;

        if !operator.may_operate(station_id) {
            warn!(
                operator_id = %operator.operator_id,
                station_id = %station_id,
                bound_to = ?operator.station_binding,
                "[tps-03] Operator not bound to station"
            );
            return Err(TpsError::AccessDenied);
        }

        Ok(station)
    }

    /// Authorize `operator` for `station_id` within `election_id`.
    pub async fn ensure_access(
        &self,
        tx: &mut dyn StoreTransaction,
        election_id: ElectionId,
        station_id: StationId,
        operator: &OperatorContext,
    ) -> Result<Station, TpsError> {
        let station = self.ensure_station_access(tx, station_id, operator).await?;
        check_pairing(&station, election_id)?;
        Ok(station)
    }
}

/// The station must serve `election_id`.
pub fn check_pairing(station: &Station, election_id: ElectionId) -> Result<(), TpsError> {
    if station.election_id != election_id {
        return Err(TpsError::StationMismatch);
    }
    Ok(())
}
