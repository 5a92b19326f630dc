//! In-memory operator directory.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{OperatorId, TpsError};
use std::collections::HashMap;

use crate::domain::OperatorContext;
use crate::ports::OperatorDirectory;

#[derive(Debug, Default)]
pub struct InMemoryOperatorDirectory {
    operators: RwLock<HashMap<OperatorId, OperatorContext>>,
}

impl InMemoryOperatorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, operator: OperatorContext) {
        self.operators.write().insert(operator.operator_id, operator);
    }

    pub fn remove(&self, operator_id: OperatorId) -> Option<OperatorContext> {
        self.operators.write().remove(&operator_id)
    }
}

#[async_trait]
impl OperatorDirectory for InMemoryOperatorDirectory {
    async fn operator(&self, operator_id: OperatorId) -> Result<Option<OperatorContext>, TpsError> {
        Ok(self.operators.read().get(&operator_id).cloned())
    }
}
