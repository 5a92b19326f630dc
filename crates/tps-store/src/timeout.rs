//! Transaction execution budget.

use shared_types::TpsError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::error::StoreError;

/// Run a transactional unit of work under a deadline.
///
/// On expiry the future is dropped, which drops its open transaction and
/// rolls it back.
pub async fn with_timeout<T, F>(budget: Duration, op: &'static str, work: F) -> Result<T, TpsError>
where
    F: Future<Output = Result<T, TpsError>>,
{
    match tokio::time::timeout(budget, work).await {
        Ok(result) => result,
        Err(_) => {
            let millis = u64::try_from(budget.as_millis()).unwrap_or(u64::MAX);
            warn!(op, millis, "Transaction exceeded its budget, rolled back");
            Err(StoreError::Timeout { millis }.into())
        }
    }
}
