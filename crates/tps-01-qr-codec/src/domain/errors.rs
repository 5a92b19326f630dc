//! Error types for the QR codec

use shared_types::TpsError;
use thiserror::Error;

/// Codec failures. All of them surface to callers as `QR_INVALID`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrCodecError {
    /// Payload does not have the `MAGIC|code|secret` shape
    #[error("Invalid QR payload: {reason}")]
    InvalidPayload { reason: &'static str },

    /// A field cannot be placed into a payload
    #[error("Invalid QR field `{field}`: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
}

impl From<QrCodecError> for TpsError {
    fn from(_: QrCodecError) -> Self {
        TpsError::QrInvalid
    }
}
