//! Compute Fleet API wire types.
//!
//! Example list response:
//! ```json
//! {"instances": [{"id": "vm-81", "name": "w1", "status": "RUNNING",
//!   "network_ip": "10.0.0.5", "labels": {"fleetward-model": "llama-7b"}}]}
//! ```

use std::collections::HashMap;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{ResourceShape, Worker, WorkerName, WorkerStatus};
use crate::port::outbound::fleet::InstanceSpec;

pub const LABEL_MODEL: &str = "fleetward-model";
pub const LABEL_QUANTIZATION: &str = "fleetward-quantization";
pub const LABEL_GPU_TYPE: &str = "fleetward-gpu-type";
pub const LABEL_GPU_COUNT: &str = "fleetward-gpu-count";

#[derive(Debug, Deserialize)]
pub struct InstanceList {
    #[serde(default)]
    pub instances: Vec<InstanceRecord>,
}

/// One VM as reported by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct InstanceRecord {
    pub id: String,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub network_ip: Option<String>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Map a provider status string onto the worker lifecycle.
#[must_use]
pub fn map_status(raw: &str) -> WorkerStatus {
    match raw.trim().to_ascii_uppercase().as_str() {
        "PROVISIONING" | "STAGING" => WorkerStatus::Provisioning,
        "RUNNING" => WorkerStatus::Running,
        "SUSPENDED" | "STOPPED" | "TERMINATED" => WorkerStatus::Paused,
        // Still winding down; not resumable yet.
        "STOPPING" | "SUSPENDING" => WorkerStatus::Unknown,
        "DELETING" => WorkerStatus::Deleting,
        _ => WorkerStatus::Unknown,
    }
}

impl InstanceRecord {
    /// Convert into a worker snapshot.
    ///
    /// Records whose name is not a valid worker name were not created by this
    /// control plane and are skipped.
    #[must_use]
    pub fn into_worker(self) -> Option<Worker> {
        let name = match WorkerName::parse(&self.name) {
            Ok(name) => name,
            Err(e) => {
                debug!(instance = %self.id, name = %self.name, error = %e, "Skipping instance");
                return None;
            }
        };
        let status = map_status(&self.status);
        let mut worker = Worker::new(name, self.id, status);

        if status == WorkerStatus::Running {
            worker.address = self
                .network_ip
                .as_deref()
                .and_then(|ip| ip.trim().parse::<IpAddr>().ok());
        }
        worker.model = self.labels.get(LABEL_MODEL).cloned();
        worker.resources = shape_from_labels(&self.labels);
        worker.created_at = self.created_at;
        Some(worker)
    }
}

fn shape_from_labels(labels: &HashMap<String, String>) -> Option<ResourceShape> {
    let count = labels.get(LABEL_GPU_COUNT)?.parse().ok()?;
    ResourceShape::parse(
        labels.get(LABEL_QUANTIZATION)?,
        labels.get(LABEL_GPU_TYPE)?,
        count,
    )
    .ok()
}

/// Body of `POST /instances`.
#[derive(Debug, Serialize)]
pub struct CreateInstanceBody {
    pub name: String,
    pub labels: HashMap<String, String>,
    pub machine: Machine,
}

#[derive(Debug, Serialize)]
pub struct Machine {
    pub gpu_type: String,
    pub gpu_count: u32,
}

impl From<&InstanceSpec> for CreateInstanceBody {
    fn from(spec: &InstanceSpec) -> Self {
        let shape = spec.resources;
        let labels = HashMap::from([
            (LABEL_MODEL.to_string(), spec.model.clone()),
            (
                LABEL_QUANTIZATION.to_string(),
                shape.quantization.as_str().to_string(),
            ),
            (LABEL_GPU_TYPE.to_string(), shape.gpu_type.as_str().to_string()),
            (LABEL_GPU_COUNT.to_string(), shape.gpu_count.to_string()),
        ]);
        Self {
            name: spec.name.to_string(),
            labels,
            machine: Machine {
                gpu_type: shape.gpu_type.as_str().to_string(),
                gpu_count: shape.gpu_count,
            },
        }
    }
}
