//! Worker lifecycle: create, pause, resume and delete.
//!
//! Every transition re-reads the worker from the directory immediately before
//! acting. Pause and delete first send the worker an advisory shutdown notice
//! whose outcome is reported separately and never fails the operation.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error, info, warn};

use super::directory::ResourceDirectory;
use super::resolver::EndpointResolver;
use crate::domain::{ModelSpec, Worker, WorkerName, WorkerStatus};
use crate::error::ApiError;
use crate::port::inbound::CreateWorker;
use crate::port::{ComputeFleet, InstanceSpec, ModelCatalog, WorkerClient};

/// Outcome of the advisory shutdown notice sent before pause and delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownNotice {
    /// The worker acknowledged the notice.
    Delivered,
    /// The worker had no reachable endpoint.
    Skipped,
    /// The notice could not be delivered; the reason was logged.
    Failed(String),
}

/// Per-name async locks serializing lifecycle calls on one worker.
///
/// An entry lives only while some call holds or waits for it.
#[derive(Debug, Default)]
struct WorkerLocks {
    locks: DashMap<WorkerName, Arc<Mutex<()>>>,
}

impl WorkerLocks {
    async fn acquire(&self, name: &WorkerName) -> WorkerLease<'_> {
        let lock = self.locks.entry(name.clone()).or_default().clone();
        let guard = lock.lock_owned().await;
        WorkerLease {
            locks: self,
            name: name.clone(),
            _guard: guard,
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.len()
    }
}

/// Held lock on one worker name. Releasing the last holder removes the entry.
struct WorkerLease<'a> {
    locks: &'a WorkerLocks,
    name: WorkerName,
    _guard: OwnedMutexGuard<()>,
}

impl Drop for WorkerLease<'_> {
    fn drop(&mut self) {
        // The map and this guard account for two references; any more are waiters.
        self.locks
            .locks
            .remove_if(&self.name, |_, lock| Arc::strong_count(lock) <= 2);
    }
}

/// Applies requested lifecycle transitions against the Compute Fleet API.
pub struct LifecycleController {
    directory: ResourceDirectory,
    fleet: Arc<dyn ComputeFleet>,
    workers: Arc<dyn WorkerClient>,
    catalog: Arc<dyn ModelCatalog>,
    resolver: EndpointResolver,
    locks: Option<WorkerLocks>,
}

impl LifecycleController {
    pub fn new(
        fleet: Arc<dyn ComputeFleet>,
        workers: Arc<dyn WorkerClient>,
        catalog: Arc<dyn ModelCatalog>,
        resolver: EndpointResolver,
    ) -> Self {
        Self {
            directory: ResourceDirectory::new(fleet.clone()),
            fleet,
            workers,
            catalog,
            resolver,
            locks: Some(WorkerLocks::default()),
        }
    }

    /// Serialize pause/resume/delete per worker name (on by default).
    #[must_use]
    pub fn serialize_per_worker(mut self, enabled: bool) -> Self {
        self.locks = enabled.then(WorkerLocks::default);
        self
    }

    async fn guard(&self, name: &WorkerName) -> Option<WorkerLease<'_>> {
        match &self.locks {
            Some(locks) => Some(locks.acquire(name).await),
            None => None,
        }
    }

    /// Provision a new worker and return its name.
    ///
    /// Does not wait for the worker to reach `Running`.
    pub async fn create(&self, command: CreateWorker) -> Result<WorkerName, ApiError> {
        let model = self.find_model(&command.model).await?;
        let quantization = command.resources.quantization;
        if !model.supports(quantization) {
            return Err(ApiError::invalid_input(format!(
                "model '{}' does not support {quantization} quantization",
                model.name
            )));
        }

        let existing = self.directory.list().await?;
        let name = match command.name {
            Some(name) => {
                if existing.iter().any(|w| w.name == name) {
                    return Err(ApiError::failed_precondition(format!(
                        "worker '{name}' already exists"
                    )));
                }
                name
            }
            None => generate_name(&model, &existing)?,
        };

        let spec = InstanceSpec {
            name: name.clone(),
            model: model.name.clone(),
            resources: command.resources,
        };
        match self.fleet.create(&spec).await {
            Ok(worker) => {
                info!(
                    worker = %name,
                    cloud_id = %worker.cloud_id,
                    model = %model.name,
                    gpu_type = %spec.resources.gpu_type,
                    gpu_count = spec.resources.gpu_count,
                    "Worker created"
                );
                Ok(name)
            }
            Err(e) => {
                error!(operation = "create", worker = %name, error = %e, "Fleet create failed");
                Err(ApiError::internal(format!("failed to create worker '{name}'")))
            }
        }
    }

    /// Pause a worker, notifying it first.
    pub async fn pause(&self, name: &WorkerName) -> Result<ShutdownNotice, ApiError> {
        let _guard = self.guard(name).await;
        let worker = self.directory.lookup(name).await?;
        if worker.status == WorkerStatus::Deleting {
            return Err(ApiError::failed_precondition(format!(
                "worker '{name}' is being deleted"
            )));
        }

        let notice = self.notify_shutdown(&worker).await;
        if let Err(e) = self.fleet.pause(&worker.cloud_id).await {
            error!(operation = "pause", worker = %name, error = %e, "Fleet pause failed");
            return Err(ApiError::internal(format!("failed to pause worker '{name}'")));
        }
        info!(worker = %name, notice = ?notice, "Worker paused");
        Ok(notice)
    }

    /// Resume a paused worker.
    pub async fn resume(&self, name: &WorkerName) -> Result<(), ApiError> {
        let _guard = self.guard(name).await;
        let worker = self.directory.lookup(name).await?;
        if !worker.is_paused() {
            return Err(ApiError::failed_precondition(format!(
                "worker '{name}' is {}, only paused workers can be resumed",
                worker.status
            )));
        }

        if let Err(e) = self.fleet.start(&worker.cloud_id).await {
            error!(operation = "resume", worker = %name, error = %e, "Fleet start failed");
            return Err(ApiError::internal(format!("failed to resume worker '{name}'")));
        }
        info!(worker = %name, "Worker resumed");
        Ok(())
    }

    /// Delete a worker, notifying it first.
    ///
    /// A worker already being deleted is left alone.
    pub async fn delete(&self, name: &WorkerName) -> Result<ShutdownNotice, ApiError> {
        let _guard = self.guard(name).await;
        let worker = self.directory.lookup(name).await?;
        if worker.status.is_terminal() {
            debug!(worker = %name, "Worker already being deleted");
            return Ok(ShutdownNotice::Skipped);
        }

        let notice = self.notify_shutdown(&worker).await;
        if let Err(e) = self.fleet.delete(&worker.cloud_id).await {
            error!(operation = "delete", worker = %name, error = %e, "Fleet delete failed");
            return Err(ApiError::internal(format!("failed to delete worker '{name}'")));
        }
        info!(worker = %name, notice = ?notice, "Worker deleted");
        Ok(notice)
    }

    async fn find_model(&self, model: &str) -> Result<ModelSpec, ApiError> {
        let found = self.catalog.find(model).await.map_err(|e| {
            error!(error = %e, "Model catalog lookup failed");
            ApiError::internal("model catalog unavailable")
        })?;
        found.ok_or_else(|| ApiError::invalid_input(format!("unknown model '{model}'")))
    }

    async fn notify_shutdown(&self, worker: &Worker) -> ShutdownNotice {
        let Some(endpoint) = self.resolver.resolve(worker) else {
            debug!(worker = %worker.name, "No endpoint, skipping shutdown notice");
            return ShutdownNotice::Skipped;
        };
        match self.workers.notify_shutdown(&endpoint).await {
            Ok(()) => {
                debug!(worker = %worker.name, endpoint = %endpoint, "Shutdown notice delivered");
                ShutdownNotice::Delivered
            }
            Err(e) => {
                warn!(
                    worker = %worker.name,
                    endpoint = %endpoint,
                    error = %e,
                    "Shutdown notice failed, continuing"
                );
                ShutdownNotice::Failed(e.to_string())
            }
        }
    }
}

/// `<model-slug>-<8 hex chars>`, avoiding names already listed.
fn generate_name(model: &ModelSpec, existing: &[Worker]) -> Result<WorkerName, ApiError> {
    let slug = model.slug();
    for _ in 0..8 {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let name = WorkerName::parse(format!("{slug}-{}", &suffix[..8]))?;
        if !existing.iter().any(|w| w.name == name) {
            return Ok(name);
        }
    }
    Err(ApiError::internal("could not generate a unique worker name"))
}
