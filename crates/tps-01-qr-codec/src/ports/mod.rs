//! Ports module for the QR codec
//!
//! Defines the inbound rotation API.

pub mod inbound;

pub use inbound::{QrRotationApi, RotatedQr};
