//! Path utilities for fleetward.
//!
//! All local state lives under `~/.fleetward/`:
//! - `~/.fleetward/config.toml` - main configuration
//! - `~/.fleetward/credentials.json` - persisted setup credentials

use std::path::PathBuf;

/// Returns the fleetward home directory (`~/.fleetward/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".fleetward")
}

/// Returns the default config file path (`~/.fleetward/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}
