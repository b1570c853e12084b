//! Handler for the `config` command group.

use std::path::Path;

use serde_json::json;

use super::output;
use crate::error::Result;
use crate::infrastructure::config::settings::{Config, API_TOKEN_ENV};

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    let config = Config::load(path)?;
    let models: Vec<&str> = config.catalog().iter().map(|m| m.name.as_str()).collect();

    if output::is_json() {
        output::json_output(json!({
            "command": "config.validate",
            "valid": true,
            "path": path.display().to_string(),
            "fleet": config.fleet.api_url,
            "models": models,
            "api_token": config.api_token.is_some(),
        }));
        return Ok(());
    }

    output::success("Configuration is valid");
    output::field("Path", path.display());
    output::field("Fleet", &config.fleet.api_url);
    output::field("Worker port", config.worker.port);
    output::field("Models", models.join(", "));
    output::field("Credentials", config.setup.credentials_path().display());
    if config.api_token.is_none() {
        output::warning(&format!(
            "{API_TOKEN_ENV} is not set; every call will be rejected"
        ));
    }
    Ok(())
}
