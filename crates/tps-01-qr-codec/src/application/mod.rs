//! Application layer for the QR codec

pub mod service;
pub mod verifier;

pub use service::QrRotationService;
pub use verifier::resolve_payload;
