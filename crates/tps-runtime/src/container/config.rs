//! # Runtime Configuration
//!
//! Unified configuration for every subsystem the runtime wires.
//!
//! ## Security Requirements
//!
//! - `vote_cast.receipt_hmac_key` MUST NOT be the all-zero default in production
//! - All timeouts and limits have sane defaults with environment overrides

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use tps_01_qr_codec::QrConfig;
use tps_02_notification_hub::HubConfig;
use tps_04_checkin::{CheckinConfig, SweepConfig, MAX_APPROVAL_WINDOW_SECS};
use tps_05_vote_cast::VoteCastConfig;

/// Approval window override (seconds).
pub const ENV_APPROVAL_WINDOW_SECS: &str = "TPS_APPROVAL_WINDOW_SECS";
/// Expiry sweep interval override (seconds).
pub const ENV_SWEEP_INTERVAL_SECS: &str = "TPS_SWEEP_INTERVAL_SECS";
/// Transaction budget override applied to every subsystem (milliseconds).
pub const ENV_TX_TIMEOUT_MS: &str = "TPS_TX_TIMEOUT_MS";
/// Receipt HMAC key, 32 bytes as 64 hex chars.
pub const ENV_RECEIPT_HMAC_KEY: &str = "TPS_RECEIPT_HMAC_KEY";
/// Per-subscriber hub buffer override.
pub const ENV_HUB_SUBSCRIBER_CAPACITY: &str = "TPS_HUB_SUBSCRIBER_CAPACITY";

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Check-in state machine.
    pub checkin: CheckinConfig,
    /// Expiry sweep task.
    pub sweep: SweepConfig,
    /// Vote-cast engine.
    pub vote_cast: VoteCastConfig,
    /// Notification hub actor.
    pub hub: HubConfig,
    /// QR rotation.
    pub qr: QrConfig,
}

impl RuntimeConfig {
    /// Validate configuration for production readiness.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - the receipt HMAC key is the default zero value
    /// - the approval window is zero or longer than a day
    /// - the hub would buffer nothing per subscriber
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.vote_cast.has_default_key() {
            return Err(ConfigError::InsecureReceiptKey);
        }
        if !approval_window_in_range(self.checkin.approval_window_secs) {
            return Err(ConfigError::InvalidValue {
                field: "checkin",
                reason: format!(
                    "approval_window_secs must be within 1..={}",
                    MAX_APPROVAL_WINDOW_SECS
                ),
            });
        }
        if self.hub.subscriber_capacity == 0 || self.hub.command_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "hub",
                reason: "channel capacities must be non-zero".to_string(),
            });
        }
        Ok(())
    }

    /// Apply `TPS_*` overrides read through `lookup`.
    ///
    /// Malformed or out-of-range values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secs) = parse_var::<u64, _>(&lookup, ENV_APPROVAL_WINDOW_SECS) {
            if approval_window_in_range(secs) {
                self.checkin.approval_window_secs = secs;
            } else {
                warn!(
                    value = secs,
                    max = MAX_APPROVAL_WINDOW_SECS,
                    "Ignoring out-of-range {}",
                    ENV_APPROVAL_WINDOW_SECS
                );
            }
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, ENV_SWEEP_INTERVAL_SECS) {
            self.sweep.interval_secs = secs;
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, ENV_TX_TIMEOUT_MS) {
            self.checkin.transaction_timeout_ms = ms;
            self.vote_cast.transaction_timeout_ms = ms;
            self.qr.transaction_timeout_ms = ms;
        }
        if let Some(capacity) = parse_var::<usize, _>(&lookup, ENV_HUB_SUBSCRIBER_CAPACITY) {
            self.hub.subscriber_capacity = capacity;
        }

        if let Some(key_hex) = lookup(ENV_RECEIPT_HMAC_KEY) {
            match hex::decode(key_hex.trim()) {
                Ok(bytes) if bytes.len() == 32 => {
                    self.vote_cast.receipt_hmac_key.copy_from_slice(&bytes);
                    info!("Loaded receipt HMAC key from environment");
                }
                Ok(_) => warn!("{} must be 32 bytes (64 hex chars)", ENV_RECEIPT_HMAC_KEY),
                Err(e) => warn!(error = %e, "{} is not valid hex", ENV_RECEIPT_HMAC_KEY),
            }
        }
    }
}

fn approval_window_in_range(secs: u64) -> bool {
    (1..=MAX_APPROVAL_WINDOW_SECS).contains(&secs)
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(value = %raw, "Ignoring malformed {}", name);
            None
        }
    }
}

/// Load configuration from defaults and the process environment.
pub fn load_config() -> RuntimeConfig {
    let mut config = RuntimeConfig::default();
    config.apply_overrides(|name| std::env::var(name).ok());
    config
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Receipt key is not set (zero value).
    #[error(
        "SECURITY VIOLATION: receipt HMAC key is default zero value. \
         Set TPS_RECEIPT_HMAC_KEY environment variable or provide in config."
    )]
    InsecureReceiptKey,

    #[error("invalid {field} configuration: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
