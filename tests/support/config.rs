use std::path::PathBuf;

use fleetward::testkit::config::{toml_with_credentials, write_config};
use tempfile::TempDir;

/// Config file in a fresh temp dir; credentials are kept in the same dir.
pub fn temp_config(api_url: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let contents = toml_with_credentials(api_url, dir.path());
    let path = write_config(dir.path(), &contents);
    (dir, path)
}

/// Config file with arbitrary contents.
pub fn temp_config_with(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), contents);
    (dir, path)
}
