//! Compute Fleet port.
//!
//! The Compute Fleet API owns the authoritative record of every worker's
//! backing VM. The manager keeps no copy; each operation lists afresh.

use async_trait::async_trait;

use crate::domain::{CloudId, ResourceShape, Worker, WorkerName};
use crate::error::Result;

/// Everything the fleet needs to provision a worker VM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSpec {
    pub name: WorkerName,
    pub model: String,
    pub resources: ResourceShape,
}

/// Cloud provider interface for worker VMs.
///
/// Implementations translate provider records into [`Worker`] snapshots.
/// Every call must be bounded by a timeout; a provider that cannot be reached
/// returns an error rather than hanging.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; lifecycle operations for different
/// workers run concurrently.
#[async_trait]
pub trait ComputeFleet: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// List every provisioned worker VM.
    async fn list(&self) -> Result<Vec<Worker>>;

    /// Create a worker VM. Returns as soon as the provider accepted the
    /// request; the worker is usually still `Provisioning`.
    async fn create(&self, spec: &InstanceSpec) -> Result<Worker>;

    /// Stop (pause) a VM, keeping its disk.
    async fn pause(&self, id: &CloudId) -> Result<()>;

    /// Start a paused VM.
    async fn start(&self, id: &CloudId) -> Result<()>;

    /// Delete a VM.
    async fn delete(&self, id: &CloudId) -> Result<()>;
}
