//! # QR Payload
//!
//! Wire format printed on a station's QR code:
//!
//! ```text
//! PEMIRA|<station_code>|<secret>
//! ```
//!
//! Exactly three `|`-delimited ASCII fields. The codec only checks shape;
//! whether the station exists or the secret is active is decided by the
//! verifier against the store.

use serde::{Deserialize, Serialize};
use shared_types::{Station, StationQr};

use super::errors::QrCodecError;

/// Leading literal of every payload.
pub const MAGIC: &str = "PEMIRA";

/// Field separator.
pub const DELIMITER: char = '|';

const FIELD_COUNT: usize = 3;

/// A decoded station QR.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QrPayload {
    pub station_code: String,
    pub secret: String,
}

impl QrPayload {
    /// Build a payload, rejecting fields that would not decode back.
    pub fn new(
        station_code: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, QrCodecError> {
        let station_code = station_code.into();
        let secret = secret.into();
        check_field("station_code", &station_code)?;
        check_field("secret", &secret)?;
        Ok(Self {
            station_code,
            secret,
        })
    }

    pub fn encode(&self) -> String {
        format!(
            "{MAGIC}{DELIMITER}{}{DELIMITER}{}",
            self.station_code, self.secret
        )
    }
}

fn check_field(field: &'static str, value: &str) -> Result<(), QrCodecError> {
    if value.is_empty() {
        return Err(QrCodecError::InvalidField {
            field,
            reason: "empty",
        });
    }
    if !value.is_ascii() {
        return Err(QrCodecError::InvalidField {
            field,
            reason: "not ascii",
        });
    }
    if value.contains(DELIMITER) {
        return Err(QrCodecError::InvalidField {
            field,
            reason: "contains delimiter",
        });
    }
    Ok(())
}

/// Payload for a station's QR row.
pub fn encode(station: &Station, qr: &StationQr) -> Result<String, QrCodecError> {
    Ok(QrPayload::new(station.code.as_str(), qr.secret.as_str())?.encode())
}

/// Parse a scanned payload.
pub fn decode(payload: &str) -> Result<QrPayload, QrCodecError> {
    if !payload.is_ascii() {
        return Err(QrCodecError::InvalidPayload {
            reason: "not ascii",
        });
    }

    let fields: Vec<&str> = payload.split(DELIMITER).collect();
    if fields.len() != FIELD_COUNT {
        return Err(QrCodecError::InvalidPayload {
            reason: "field count",
        });
    }
    if fields[0] != MAGIC {
        return Err(QrCodecError::InvalidPayload {
            reason: "magic mismatch",
        });
    }
    if fields[1].is_empty() || fields[2].is_empty() {
        return Err(QrCodecError::InvalidPayload {
            reason: "empty field",
        });
    }

    Ok(QrPayload {
        station_code: fields[1].to_string(),
        secret: fields[2].to_string(),
    })
}
