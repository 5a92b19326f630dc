//! Outbound Ports (Driven Ports / SPI)

use async_trait::async_trait;
use shared_types::{OperatorId, TpsError};

use crate::domain::OperatorContext;

/// Lookup of operator accounts and their station bindings.
///
/// Owned by the authentication collaborator; the guard only reads it.
#[async_trait]
pub trait OperatorDirectory: Send + Sync {
    async fn operator(&self, operator_id: OperatorId) -> Result<Option<OperatorContext>, TpsError>;
}
