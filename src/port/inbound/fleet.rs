//! The operations exposed at the control-plane boundary.

use async_trait::async_trait;

use super::operation::Caller;
use super::request::{ChatRequest, CreateWorkerRequest, SetupRequest, WorkerRequest};
use super::stream::GenerationStream;
use crate::domain::WorkerSummary;
use crate::error::ApiError;

/// Control-plane use cases consumed by inbound adapters.
///
/// Every method runs the full request pipeline and only ever fails with
/// the boundary taxonomy.
#[async_trait]
pub trait FleetOperations: Send + Sync {
    /// One-time bootstrap. Idempotent once completed; with no payload it is a
    /// readiness probe.
    async fn setup(&self, caller: &Caller, request: SetupRequest) -> Result<(), ApiError>;

    /// Names of the servable models.
    async fn list_models(&self, caller: &Caller) -> Result<Vec<String>, ApiError>;

    async fn list_workers(&self, caller: &Caller) -> Result<Vec<WorkerSummary>, ApiError>;

    /// Provision a worker and return its assigned name.
    async fn create_worker(
        &self,
        caller: &Caller,
        request: CreateWorkerRequest,
    ) -> Result<String, ApiError>;

    async fn pause_worker(&self, caller: &Caller, request: WorkerRequest)
        -> Result<String, ApiError>;

    async fn resume_worker(
        &self,
        caller: &Caller,
        request: WorkerRequest,
    ) -> Result<String, ApiError>;

    async fn delete_worker(
        &self,
        caller: &Caller,
        request: WorkerRequest,
    ) -> Result<String, ApiError>;

    /// Open a streaming chat completion against a running worker.
    async fn chat_completion(
        &self,
        caller: &Caller,
        request: ChatRequest,
    ) -> Result<GenerationStream, ApiError>;
}
