//! Configured model catalog.

use async_trait::async_trait;

use crate::domain::ModelSpec;
use crate::error::Result;
use crate::port::outbound::catalog::ModelCatalog;

/// Catalog backed by a fixed list, usually from `[[models]]`.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    models: Vec<ModelSpec>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(models: Vec<ModelSpec>) -> Self {
        Self { models }
    }
}

#[async_trait]
impl ModelCatalog for StaticCatalog {
    async fn models(&self) -> Result<Vec<ModelSpec>> {
        Ok(self.models.clone())
    }
}
