//! Canonical test configurations.

use std::path::{Path, PathBuf};

use crate::infrastructure::config::Config;

/// Smallest valid configuration pointing at `api_url`.
pub fn minimal_toml(api_url: &str) -> String {
    format!("[fleet]\napi_url = \"{api_url}\"\n")
}

/// Configuration whose credentials live under `dir`.
pub fn toml_with_credentials(api_url: &str, dir: &Path) -> String {
    format!(
        "{}\n[setup]\ncredentials_path = {:?}\n",
        minimal_toml(api_url),
        dir.join("credentials.json").display().to_string()
    )
}

/// Write `contents` to `dir/config.toml` and return the path.
pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

/// Parsed minimal configuration.
pub fn minimal_config() -> Config {
    Config::parse_toml(&minimal_toml("http://fleet.test/v1")).unwrap()
}
