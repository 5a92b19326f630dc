//! Domain module for the QR codec
//!
//! Payload format, secrets and codec errors.

pub mod errors;
pub mod payload;
pub mod secret;

pub use errors::QrCodecError;
pub use payload::{decode, encode, QrPayload, DELIMITER, MAGIC};
pub use secret::{generate_secret, secrets_match, SECRET_LENGTH};
