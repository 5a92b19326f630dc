//! # Vote Receipts
//!
//! The voter gets a random token once. The vote row keeps only
//! `HMAC-SHA256(key, token)`, so the token cannot be recovered from storage
//! and hashes cannot be recomputed without the key.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use shared_types::{CheckinId, ElectionId, StationId};
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Token length in bytes (hex-encoded to twice this).
pub const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiptError {
    #[error("Invalid receipt key length")]
    InvalidKey,
}

/// Handed to the voter after a successful vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    /// Hex token. Shown once, never stored.
    pub receipt_token: String,
    pub election_id: ElectionId,
    pub station_id: StationId,
    pub checkin_id: CheckinId,
    pub cast_at: DateTime<Utc>,
}

/// Fresh random receipt token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Keyed hasher for receipt tokens.
#[derive(Clone)]
pub struct ReceiptHasher {
    mac: HmacSha256,
}

impl ReceiptHasher {
    pub fn new(key: &[u8]) -> Result<Self, ReceiptError> {
        let mac = HmacSha256::new_from_slice(key).map_err(|_| ReceiptError::InvalidKey)?;
        Ok(Self { mac })
    }

    /// Hex digest stored in the vote row.
    pub fn hash(&self, token: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Constant-time check of a presented token against a stored digest.
    pub fn verify(&self, token: &str, stored_hash: &str) -> bool {
        let Ok(expected) = hex::decode(stored_hash) else {
            return false;
        };
        let mut mac = self.mac.clone();
        mac.update(token.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}
