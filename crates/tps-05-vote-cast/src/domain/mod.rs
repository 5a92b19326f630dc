//! Domain module for vote casting

pub mod receipt;

pub use receipt::{generate_token, ReceiptError, ReceiptHasher, VoteReceipt, TOKEN_BYTES};
