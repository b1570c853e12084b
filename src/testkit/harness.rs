//! A fully wired [`FleetManager`] over the in-memory doubles.

use std::sync::Arc;
use std::time::Duration;

use super::credentials::MemoryCredentialStore;
use super::fleet::FakeFleet;
use super::worker::ScriptedWorker;
use crate::adapter::outbound::catalog::StaticCatalog;
use crate::application::{Collaborators, DispatchSettings, FleetManager, ManagerSettings};
use crate::domain::{default_catalog, Worker};
use crate::port::inbound::Caller;

/// The built-in model catalog.
pub fn static_catalog() -> Arc<StaticCatalog> {
    Arc::new(StaticCatalog::new(default_catalog()))
}

/// Token the harness manager accepts.
pub const TEST_TOKEN: &str = "test-token";

pub struct Harness {
    pub fleet: Arc<FakeFleet>,
    pub workers: Arc<ScriptedWorker>,
    pub credentials: Arc<MemoryCredentialStore>,
    pub manager: FleetManager,
}

impl Harness {
    /// Manager whose setup already completed, over `workers`.
    pub fn ready(workers: Vec<Worker>) -> Self {
        Self::build(Arc::new(MemoryCredentialStore::persisted()), workers)
    }

    /// Manager that has not been set up yet.
    pub fn fresh(workers: Vec<Worker>) -> Self {
        Self::build(Arc::new(MemoryCredentialStore::new()), workers)
    }

    fn build(credentials: Arc<MemoryCredentialStore>, workers: Vec<Worker>) -> Self {
        let fleet = Arc::new(FakeFleet::with_workers(workers));
        let scripted = Arc::new(ScriptedWorker::new());
        let manager = FleetManager::new(
            Collaborators {
                fleet: fleet.clone(),
                workers: scripted.clone(),
                catalog: static_catalog(),
                credentials: credentials.clone(),
            },
            ManagerSettings {
                api_token: Some(TEST_TOKEN.to_string()),
                dispatch: DispatchSettings {
                    buffer: 8,
                    idle_timeout: Duration::from_millis(500),
                },
                ..ManagerSettings::default()
            },
        );
        Self {
            fleet,
            workers: scripted,
            credentials,
            manager,
        }
    }

    /// Caller presenting the accepted token.
    pub fn caller() -> Caller {
        Caller::bearer(TEST_TOKEN)
    }
}
