//! Bootstrap, lifecycle and catalog settings.

use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::{default_catalog, ModelSpec, Quantization};

/// `[setup]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetupConfig {
    /// Where the bootstrap credentials are persisted.
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
}

impl SetupConfig {
    /// Configured path, or `~/.fleetward/credentials.json`.
    #[must_use]
    pub fn credentials_path(&self) -> PathBuf {
        self.credentials_path.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".fleetward")
                .join("credentials.json")
        })
    }
}

/// `[lifecycle]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LifecycleConfig {
    /// Serialize pause/resume/delete per worker name.
    #[serde(default = "default_serialize_per_worker")]
    pub serialize_per_worker: bool,
}

fn default_serialize_per_worker() -> bool {
    true
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            serialize_per_worker: default_serialize_per_worker(),
        }
    }
}

/// One `[[models]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    /// Supported quantizations; all of them when omitted.
    #[serde(default)]
    pub quantizations: Option<Vec<String>>,
}

/// Resolve configured entries into the catalog. Empty means the built-in one.
pub(crate) fn catalog_from_entries(
    entries: &[ModelEntry],
) -> Result<Vec<ModelSpec>, (&'static str, String)> {
    if entries.is_empty() {
        return Ok(default_catalog());
    }
    entries
        .iter()
        .map(|entry| {
            let name = entry.name.trim();
            if name.is_empty() {
                return Err(("models.name", "must not be empty".to_string()));
            }
            let spec = ModelSpec::new(name);
            match &entry.quantizations {
                None => Ok(spec),
                Some(list) if list.is_empty() => Err((
                    "models.quantizations",
                    format!("model '{name}' lists no quantizations"),
                )),
                Some(list) => {
                    let quantizations = list
                        .iter()
                        .map(|q| q.parse::<Quantization>())
                        .collect::<Result<Vec<_>, _>>()
                        .map_err(|e| ("models.quantizations", e.to_string()))?;
                    Ok(spec.with_quantizations(quantizations))
                }
            }
        })
        .collect()
}
