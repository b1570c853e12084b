//! Builders for domain primitives used across tests.
//!
//! Concise factories for [`WorkerName`], [`Worker`] snapshots and resource
//! shapes so tests focus on assertions rather than construction boilerplate.

use crate::domain::{GpuType, Quantization, ResourceShape, Worker, WorkerName, WorkerStatus};

/// Parse a worker name, panicking on invalid input.
pub fn name(raw: &str) -> WorkerName {
    WorkerName::parse(raw).expect("valid worker name")
}

/// The shape from the reference scenario: int8 on one A100.
pub fn shape() -> ResourceShape {
    ResourceShape {
        quantization: Quantization::Int8,
        gpu_type: GpuType::A100,
        gpu_count: 1,
    }
}

/// A worker with the given status and no address. Cloud id is `vm-<name>`.
pub fn worker_with_status(worker: &str, status: WorkerStatus) -> Worker {
    Worker::new(name(worker), format!("vm-{worker}"), status)
        .with_model("llama-7b")
        .with_resources(shape())
}

/// A running worker reachable at `address`.
pub fn running_worker(worker: &str, address: &str) -> Worker {
    worker_with_status(worker, WorkerStatus::Running)
        .with_address(address.parse().expect("valid IP address"))
}

pub fn paused_worker(worker: &str) -> Worker {
    worker_with_status(worker, WorkerStatus::Paused)
}

pub fn provisioning_worker(worker: &str) -> Worker {
    worker_with_status(worker, WorkerStatus::Provisioning)
}

/// Service-account key-file text for `project`.
pub fn key_file(project: &str) -> String {
    serde_json::json!({
        "type": "service_account",
        "project_id": project,
        "private_key_id": "0123456789abcdef",
        "client_email": format!("fleetward@{project}.iam.example.com"),
    })
    .to_string()
}
