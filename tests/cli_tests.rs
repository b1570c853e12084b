mod support;

use std::path::Path;

use assert_cmd::Command;
use fleetward::testkit::http::{StubResponse, StubServer};
use fleetward::testkit::key_file;
use predicates::prelude::*;
use support::config::{temp_config, temp_config_with};

const API_TOKEN: &str = "cli-secret";

fn fleetward(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fleetward").unwrap();
    cmd.env("FLEETWARD_API_TOKEN", API_TOKEN)
        .env_remove("FLEETWARD_TOKEN")
        .env_remove("FLEETWARD_FLEET_TOKEN")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(config);
    cmd
}

#[test]
fn config_validate_accepts_a_good_file() {
    let (_dir, path) = temp_config("http://127.0.0.1:9/v1");
    fleetward(&path)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://127.0.0.1:9/v1"));
}

#[test]
fn config_validate_reports_invalid_file() {
    let (_dir, path) =
        temp_config_with("[fleet]\napi_url = \"http://fleet.test\"\n[logging]\nformat = \"xml\"\n");
    fleetward(&path)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[config]"))
        .stderr(predicate::str::contains("logging.format"));
}

#[test]
fn calls_without_token_are_unauthenticated() {
    let (_dir, path) = temp_config("http://127.0.0.1:9/v1");
    fleetward(&path)
        .arg("models")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[unauthenticated]"));
}

#[test]
fn calls_before_setup_are_rejected() {
    let (_dir, path) = temp_config("http://127.0.0.1:9/v1");
    fleetward(&path)
        .args(["models", "--token", API_TOKEN])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[failed_precondition]"));
}

#[test]
fn setup_then_models_lists_catalog() {
    let (dir, path) = temp_config("http://127.0.0.1:9/v1");
    let key_path = dir.path().join("key.json");
    std::fs::write(&key_path, key_file("demo-project")).unwrap();

    fleetward(&path)
        .args(["setup", "--token", API_TOKEN, "--key-file"])
        .arg(&key_path)
        .assert()
        .success();
    assert!(dir.path().join("credentials.json").is_file());

    fleetward(&path)
        .args(["models", "--json", "--token", API_TOKEN])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"command\":\"models\""))
        .stdout(predicate::str::contains("llama-7b"));
}

#[test]
fn setup_rejects_malformed_key_file() {
    let (dir, path) = temp_config("http://127.0.0.1:9/v1");
    let key_path = dir.path().join("key.json");
    std::fs::write(&key_path, "{not json").unwrap();

    fleetward(&path)
        .args(["setup", "--token", API_TOKEN, "--key-file"])
        .arg(&key_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[invalid_input]"));
    assert!(!dir.path().join("credentials.json").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn workers_json_lists_fleet_instances() {
    let server = StubServer::start(vec![StubResponse::ok(
        r#"{"instances": [
            {"id": "vm-1", "name": "w1", "status": "RUNNING", "network_ip": "10.0.0.5",
             "labels": {"fleetward-model": "llama-7b"}}
        ]}"#,
    )])
    .await;
    let (dir, path) = temp_config(&server.url());
    std::fs::write(dir.path().join("credentials.json"), key_file("demo")).unwrap();

    let output = tokio::task::spawn_blocking(move || {
        fleetward(&path)
            .args(["workers", "--json", "--token", API_TOKEN])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(value["workers"][0]["name"], "w1");
    assert_eq!(value["workers"][0]["status"], "running");
    assert_eq!(server.requests()[0].path, "/instances");
}
