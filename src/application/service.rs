//! The control-plane facade: every boundary operation behind its pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::directory::ResourceDirectory;
use super::dispatcher::{DispatchSettings, GenerationDispatcher};
use super::lifecycle::LifecycleController;
use super::pipeline::{Authenticate, Call, Pipeline};
use super::resolver::EndpointResolver;
use super::setup::{SetupGate, SetupService};
use crate::domain::WorkerSummary;
use crate::error::{ApiError, Error};
use crate::port::inbound::{
    Caller, ChatRequest, CreateWorkerRequest, FleetOperations, GenerationStream, Operation,
    SetupRequest, WorkerRequest,
};
use crate::port::{ComputeFleet, CredentialStore, ModelCatalog, WorkerClient};

/// Outbound collaborators the manager drives.
#[derive(Clone)]
pub struct Collaborators {
    pub fleet: Arc<dyn ComputeFleet>,
    pub workers: Arc<dyn WorkerClient>,
    pub catalog: Arc<dyn ModelCatalog>,
    pub credentials: Arc<dyn CredentialStore>,
}

/// Manager tuning taken from configuration.
#[derive(Debug, Clone)]
pub struct ManagerSettings {
    /// Token callers must present. `None` rejects every call.
    pub api_token: Option<String>,
    pub worker_port: u16,
    pub worker_tls: bool,
    pub dispatch: DispatchSettings,
    pub serialize_per_worker: bool,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            api_token: None,
            worker_port: 8080,
            worker_tls: false,
            dispatch: DispatchSettings::default(),
            serialize_per_worker: true,
        }
    }
}

/// Implements [`FleetOperations`] over the application services.
pub struct FleetManager {
    gated: Pipeline,
    ungated: Pipeline,
    setup: SetupService,
    directory: ResourceDirectory,
    lifecycle: LifecycleController,
    dispatcher: GenerationDispatcher,
    catalog: Arc<dyn ModelCatalog>,
}

impl FleetManager {
    /// Wire the manager. The setup gate starts open when credentials were
    /// persisted by an earlier run.
    pub fn new(collaborators: Collaborators, settings: ManagerSettings) -> Self {
        let Collaborators {
            fleet,
            workers,
            catalog,
            credentials,
        } = collaborators;

        let done = credentials.is_persisted();
        debug!(setup_done = done, "Initializing setup gate");
        let gate = Arc::new(SetupGate::new(done));
        let resolver = EndpointResolver::new(settings.worker_port, settings.worker_tls);

        Self {
            gated: Pipeline::builder(Authenticate::new(settings.api_token.clone()))
                .gated(gate.clone())
                .build(),
            ungated: Pipeline::builder(Authenticate::new(settings.api_token)).build(),
            setup: SetupService::new(gate, credentials),
            directory: ResourceDirectory::new(fleet.clone()),
            lifecycle: LifecycleController::new(
                fleet.clone(),
                workers.clone(),
                catalog.clone(),
                resolver,
            )
            .serialize_per_worker(settings.serialize_per_worker),
            dispatcher: GenerationDispatcher::new(fleet, workers, resolver, settings.dispatch),
            catalog,
        }
    }

    #[must_use]
    pub fn setup_gate(&self) -> &Arc<SetupGate> {
        self.setup.gate()
    }
}

#[async_trait]
impl FleetOperations for FleetManager {
    async fn setup(&self, caller: &Caller, request: SetupRequest) -> Result<(), ApiError> {
        let call = Call::new(Operation::Setup, caller, &request);
        self.ungated
            .run(call, || async { Ok::<_, Error>(self.setup.setup(&request).await?) })
            .await
    }

    async fn list_models(&self, caller: &Caller) -> Result<Vec<String>, ApiError> {
        let call = Call::new(Operation::ListModels, caller, &());
        self.gated
            .run(call, || async {
                let models = self.catalog.models().await?;
                Ok::<_, Error>(models.into_iter().map(|m| m.name).collect::<Vec<_>>())
            })
            .await
    }

    async fn list_workers(&self, caller: &Caller) -> Result<Vec<WorkerSummary>, ApiError> {
        let call = Call::new(Operation::ListWorkers, caller, &());
        self.gated
            .run(call, || async {
                let workers = self.directory.list().await?;
                Ok::<_, Error>(workers.iter().map(|w| w.summary()).collect::<Vec<_>>())
            })
            .await
    }

    async fn create_worker(
        &self,
        caller: &Caller,
        request: CreateWorkerRequest,
    ) -> Result<String, ApiError> {
        let call = Call::new(Operation::CreateWorker, caller, &request);
        self.gated
            .run(call, || async {
                let name = self.lifecycle.create(request.parse()?).await?;
                Ok::<_, Error>(name.to_string())
            })
            .await
    }

    async fn pause_worker(
        &self,
        caller: &Caller,
        request: WorkerRequest,
    ) -> Result<String, ApiError> {
        let call = Call::new(Operation::PauseWorker, caller, &request);
        self.gated
            .run(call, || async {
                let name = request.parse()?;
                self.lifecycle.pause(&name).await?;
                Ok::<_, Error>(name.to_string())
            })
            .await
    }

    async fn resume_worker(
        &self,
        caller: &Caller,
        request: WorkerRequest,
    ) -> Result<String, ApiError> {
        let call = Call::new(Operation::ResumeWorker, caller, &request);
        self.gated
            .run(call, || async {
                let name = request.parse()?;
                self.lifecycle.resume(&name).await?;
                Ok::<_, Error>(name.to_string())
            })
            .await
    }

    async fn delete_worker(
        &self,
        caller: &Caller,
        request: WorkerRequest,
    ) -> Result<String, ApiError> {
        let call = Call::new(Operation::DeleteWorker, caller, &request);
        self.gated
            .run(call, || async {
                let name = request.parse()?;
                self.lifecycle.delete(&name).await?;
                Ok::<_, Error>(name.to_string())
            })
            .await
    }

    async fn chat_completion(
        &self,
        caller: &Caller,
        request: ChatRequest,
    ) -> Result<GenerationStream, ApiError> {
        let call = Call::new(Operation::ChatCompletion, caller, &request);
        self.gated
            .run(call, || async {
                Ok::<_, Error>(self.dispatcher.dispatch(request.parse()?).await?)
            })
            .await
    }
}
