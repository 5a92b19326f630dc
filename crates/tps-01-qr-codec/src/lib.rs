//! # QR Codec Subsystem
//!
//! **Subsystem ID:** 1
//!
//! ## Purpose
//!
//! Encodes and decodes the payload printed on a station's QR code, generates
//! station secrets and rotates them.
//!
//! ## Payload
//!
//! ```text
//! PEMIRA|<station_code>|<secret>
//! ```
//!
//! Any deviation in magic literal, delimiter count or field count is
//! rejected as `QR_INVALID`. The codec does not touch the store; existence
//! and activity checks live in `resolve_payload`.
//!
//! ## Rotation Invariant
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | At most one active QR per station | `QrRotationService::rotate` locks the QR set, revokes, inserts, commits once |
//! | A revoked QR never validates | `resolve_payload` returns `QR_REVOKED` for inactive rows |
//!
//! ## Module Structure
//!
//! ```text
//! domain/       payload codec, secrets, QrCodecError
//! ports/        QrRotationApi
//! application/  QrRotationService, resolve_payload
//! ```

#![warn(clippy::all)]

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::{resolve_payload, QrRotationService};
pub use config::QrConfig;
pub use domain::*;
pub use ports::*;
