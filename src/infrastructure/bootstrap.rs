//! Composition root: turns a loaded [`Config`] into a running manager.

use std::sync::Arc;

use tracing::debug;

use crate::adapter::outbound::catalog::StaticCatalog;
use crate::adapter::outbound::credentials::FileCredentialStore;
use crate::adapter::outbound::fleet::HttpFleet;
use crate::adapter::outbound::worker::WsWorkerClient;
use crate::application::{Collaborators, DispatchSettings, FleetManager, ManagerSettings};
use crate::infrastructure::config::settings::Config;

/// Outbound adapters selected by the configuration.
pub(crate) fn build_collaborators(config: &Config) -> Collaborators {
    let credentials = FileCredentialStore::new(config.setup.credentials_path());
    debug!(
        fleet = %config.fleet.api_url,
        credentials = %credentials.path().display(),
        models = config.catalog().len(),
        "Building collaborators"
    );

    Collaborators {
        fleet: Arc::new(HttpFleet::from_config(&config.fleet)),
        workers: Arc::new(WsWorkerClient::from_config(&config.worker)),
        catalog: Arc::new(StaticCatalog::new(config.catalog().to_vec())),
        credentials: Arc::new(credentials),
    }
}

/// Manager tuning from configuration.
#[must_use]
pub fn manager_settings(config: &Config) -> ManagerSettings {
    ManagerSettings {
        api_token: config.api_token.clone(),
        worker_port: config.worker.port,
        worker_tls: config.worker.tls,
        dispatch: DispatchSettings {
            buffer: config.worker.stream_buffer,
            idle_timeout: config.worker.idle_timeout(),
        },
        serialize_per_worker: config.lifecycle.serialize_per_worker,
    }
}

/// Wire a [`FleetManager`] against the real collaborators.
#[must_use]
pub fn build_manager(config: &Config) -> FleetManager {
    FleetManager::new(build_collaborators(config), manager_settings(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn settings_follow_config() {
        let config = Config::parse_toml(
            r#"
[fleet]
api_url = "http://fleet.local"

[worker]
port = 9443
tls = true
idle_timeout_secs = 30
stream_buffer = 4

[lifecycle]
serialize_per_worker = false
"#,
        )
        .unwrap();

        let settings = manager_settings(&config);
        assert_eq!(settings.worker_port, 9443);
        assert!(settings.worker_tls);
        assert_eq!(settings.dispatch.buffer, 4);
        assert_eq!(settings.dispatch.idle_timeout, Duration::from_secs(30));
        assert!(!settings.serialize_per_worker);
    }

    #[test]
    fn fresh_credentials_path_leaves_gate_closed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let config = Config::parse_toml(&format!(
            "[fleet]\napi_url = \"http://fleet.local\"\n[setup]\ncredentials_path = {:?}\n",
            path.display().to_string()
        ))
        .unwrap();

        let manager = build_manager(&config);
        assert!(!manager.setup_gate().is_done());

        std::fs::write(&path, "{}").unwrap();
        let manager = build_manager(&config);
        assert!(manager.setup_gate().is_done());
    }
}
