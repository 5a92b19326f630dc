//! Resolution of a scanned payload against the station's QR rows.

use shared_types::{Station, StationQr, TpsError};
use tps_store::StoreTransaction;
use tracing::debug;

use crate::domain::{decode, secrets_match};

/// Decode `raw` and find the station and QR row it refers to.
///
/// | Outcome | Error |
/// |---------|-------|
/// | malformed payload, unknown station code, unknown secret | `QrInvalid` |
/// | secret matches a deactivated row | `QrRevoked` |
pub async fn resolve_payload(
    tx: &mut dyn StoreTransaction,
    raw: &str,
) -> Result<(Station, StationQr), TpsError> {
    let payload = decode(raw)?;

    let station = tx
        .station_by_code(&payload.station_code)
        .await?
        .ok_or(TpsError::QrInvalid)?;

    // No early exit: every row is compared.
    let mut matched = None;
    for qr in tx.station_qrs(station.id).await? {
        if secrets_match(&qr.secret, &payload.secret) && matched.is_none() {
            matched = Some(qr);
        }
    }

    let qr = matched.ok_or(TpsError::QrInvalid)?;
    if !qr.active {
        debug!(station_id = %station.id, qr_id = %qr.id, "[tps-01] Revoked QR presented");
        return Err(TpsError::QrRevoked);
    }

    Ok((station, qr))
}
