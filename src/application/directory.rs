//! Authoritative worker listing backed by the Compute Fleet API.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{Worker, WorkerName};
use crate::error::{ApiError, Error};
use crate::port::ComputeFleet;

/// Read side of the fleet. Holds no cache: every call lists afresh.
#[derive(Clone)]
pub struct ResourceDirectory {
    fleet: Arc<dyn ComputeFleet>,
}

impl ResourceDirectory {
    pub fn new(fleet: Arc<dyn ComputeFleet>) -> Self {
        Self { fleet }
    }

    /// Every provisioned worker.
    pub async fn list(&self) -> Result<Vec<Worker>, ApiError> {
        self.fleet.list().await.map_err(|e| {
            warn!(fleet = self.fleet.name(), error = %e, "Failed to list workers");
            match e {
                Error::Api(api) => api,
                _ => ApiError::upstream_unavailable("compute fleet could not be reached"),
            }
        })
    }

    /// The worker called `name`, or `NotFound`.
    pub async fn lookup(&self, name: &WorkerName) -> Result<Worker, ApiError> {
        let worker = self.list().await?.into_iter().find(|w| &w.name == name);
        worker.ok_or_else(|| {
            debug!(worker = %name, "Worker not found");
            ApiError::not_found(format!("worker '{name}' does not exist"))
        })
    }
}
