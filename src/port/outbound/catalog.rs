//! Model catalog port.

use async_trait::async_trait;

use crate::domain::ModelSpec;
use crate::error::Result;

/// Source of models the fleet can serve.
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    /// Every servable model, in display order.
    async fn models(&self) -> Result<Vec<ModelSpec>>;

    /// Find a model by exact name.
    async fn find(&self, name: &str) -> Result<Option<ModelSpec>> {
        Ok(self.models().await?.into_iter().find(|m| m.name == name))
    }
}
