//! Worker lifecycle behavior through the public operations.

use std::sync::Arc;
use std::time::Duration;

use fleetward::domain::WorkerStatus;
use fleetward::error::{Error, ErrorKind};
use fleetward::port::inbound::{CreateWorkerRequest, FleetOperations, WorkerRequest};
use fleetward::testkit::{
    paused_worker, provisioning_worker, running_worker, worker_with_status, FleetCall, Harness,
};

fn create_request(model: &str, quantization: &str, name: Option<&str>) -> CreateWorkerRequest {
    CreateWorkerRequest {
        model: model.into(),
        quantization: quantization.into(),
        gpu_type: "A100".into(),
        gpu_count: 1,
        name: name.map(String::from),
    }
}

fn worker(name: &str) -> WorkerRequest {
    WorkerRequest::new(name)
}

#[tokio::test]
async fn create_then_list_shows_provisioning() {
    let harness = Harness::ready(Vec::new());
    let caller = Harness::caller();

    let name = harness
        .manager
        .create_worker(&caller, create_request("llama-7b", "int8", Some("w1")))
        .await
        .unwrap();
    assert_eq!(name, "w1");

    let workers = harness.manager.list_workers(&caller).await.unwrap();
    assert_eq!(workers.len(), 1);
    assert_eq!(workers[0].name, "w1");
    assert_eq!(workers[0].status, WorkerStatus::Provisioning);
    assert_eq!(workers[0].address, None);
}

#[tokio::test]
async fn running_worker_pause_resume_and_unknown_delete() {
    let harness = Harness::ready(vec![running_worker("w1", "10.0.0.5")]);
    let caller = Harness::caller();

    let paused = harness
        .manager
        .pause_worker(&caller, worker("w1"))
        .await
        .unwrap();
    assert_eq!(paused, "w1");

    let targets = harness.workers.shutdown_targets();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].address.to_string(), "10.0.0.5");
    assert_eq!(targets[0].port, 8080);
    assert_eq!(harness.fleet.calls(), vec![FleetCall::Pause("vm-w1".into())]);

    let workers = harness.manager.list_workers(&caller).await.unwrap();
    assert_eq!(workers[0].status, WorkerStatus::Paused);

    let resumed = harness
        .manager
        .resume_worker(&caller, worker("w1"))
        .await
        .unwrap();
    assert_eq!(resumed, "w1");
    let workers = harness.manager.list_workers(&caller).await.unwrap();
    assert_eq!(workers[0].status, WorkerStatus::Running);
    assert_eq!(workers[0].address.as_deref(), Some("10.0.0.5"));

    let err = harness
        .manager
        .delete_worker(&caller, worker("w2"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(harness.fleet.mutation_count(), 2);
}

#[tokio::test]
async fn full_lifecycle_ends_with_the_worker_absent() {
    let harness = Harness::ready(Vec::new());
    let caller = Harness::caller();
    let ops: &dyn FleetOperations = &harness.manager;

    ops.create_worker(&caller, create_request("mistral-7b", "int4", Some("w1")))
        .await
        .unwrap();
    harness.fleet.finish_boot("w1", "10.0.0.9");
    ops.pause_worker(&caller, worker("w1")).await.unwrap();
    ops.resume_worker(&caller, worker("w1")).await.unwrap();
    ops.delete_worker(&caller, worker("w1")).await.unwrap();

    assert!(ops.list_workers(&caller).await.unwrap().is_empty());
    assert_eq!(harness.workers.shutdown_count(), 2);
    let calls = harness.fleet.calls();
    assert_eq!(calls.len(), 4);
    assert!(matches!(calls[0], FleetCall::Create(_)));
    assert!(matches!(calls[3], FleetCall::Delete(_)));
}

#[tokio::test]
async fn unknown_names_fail_without_mutations() {
    let harness = Harness::ready(vec![running_worker("w1", "10.0.0.5")]);
    let caller = Harness::caller();
    let ops: &dyn FleetOperations = &harness.manager;

    for result in [
        ops.pause_worker(&caller, worker("ghost")).await,
        ops.resume_worker(&caller, worker("ghost")).await,
        ops.delete_worker(&caller, worker("ghost")).await,
    ] {
        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }
    assert_eq!(harness.fleet.mutation_count(), 0);
    assert_eq!(harness.workers.shutdown_count(), 0);
}

#[tokio::test]
async fn resume_requires_a_paused_worker() {
    let harness = Harness::ready(vec![
        running_worker("w1", "10.0.0.5"),
        provisioning_worker("w2"),
    ]);
    let caller = Harness::caller();

    for name in ["w1", "w2"] {
        let err = harness
            .manager
            .resume_worker(&caller, worker(name))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FailedPrecondition);
    }
    assert_eq!(harness.fleet.mutation_count(), 0);
}

#[tokio::test]
async fn unreachable_workers_still_pause_and_delete() {
    let harness = Harness::ready(vec![
        provisioning_worker("w1"),
        worker_with_status("w2", WorkerStatus::Running),
    ]);
    let caller = Harness::caller();

    harness
        .manager
        .pause_worker(&caller, worker("w1"))
        .await
        .unwrap();
    harness
        .manager
        .delete_worker(&caller, worker("w2"))
        .await
        .unwrap();

    assert_eq!(harness.workers.shutdown_count(), 0);
    assert_eq!(
        harness.fleet.calls(),
        vec![
            FleetCall::Pause("vm-w1".into()),
            FleetCall::Delete("vm-w2".into())
        ]
    );
}

#[tokio::test]
async fn failed_shutdown_notice_does_not_block_pause() {
    let harness = Harness::ready(vec![running_worker("w1", "10.0.0.5")]);
    harness.workers.fail_shutdown();

    harness
        .manager
        .pause_worker(&Harness::caller(), worker("w1"))
        .await
        .unwrap();
    assert_eq!(harness.workers.shutdown_count(), 1);
    assert_eq!(harness.fleet.mutation_count(), 1);
}

#[tokio::test]
async fn failed_fleet_mutation_is_internal_without_upstream_text() {
    let harness = Harness::ready(vec![paused_worker("w1")]);
    harness
        .fleet
        .fail_next_mutation(Error::Connection("quota exceeded in zone us-x1".into()));

    let err = harness
        .manager
        .resume_worker(&Harness::caller(), worker("w1"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(!err.message().contains("quota"));
}

#[tokio::test]
async fn unreachable_fleet_is_upstream_unavailable() {
    let harness = Harness::ready(Vec::new());
    harness
        .fleet
        .fail_next_list(Error::Timeout("list instances".into()));

    let err = harness
        .manager
        .list_workers(&Harness::caller())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
}

#[tokio::test]
async fn create_checks_model_and_name_before_calling_the_fleet() {
    let harness = Harness::ready(vec![running_worker("w1", "10.0.0.5")]);
    let caller = Harness::caller();
    let ops: &dyn FleetOperations = &harness.manager;

    let err = ops
        .create_worker(&caller, create_request("gpt-17", "int8", None))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = ops
        .create_worker(&caller, create_request("mpt-7b-chat", "int8", None))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = ops
        .create_worker(&caller, create_request("llama-7b", "int8", Some("w1")))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FailedPrecondition);

    assert_eq!(harness.fleet.mutation_count(), 0);
}

#[tokio::test]
async fn generated_names_follow_the_model() {
    let harness = Harness::ready(Vec::new());
    let name = harness
        .manager
        .create_worker(
            &Harness::caller(),
            create_request("llama-13b", "float16", None),
        )
        .await
        .unwrap();

    let (prefix, suffix) = name.rsplit_once('-').unwrap();
    assert_eq!(prefix, "llama-13b");
    assert_eq!(suffix.len(), 8);
    assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn lifecycle_calls_on_one_worker_are_serialized() {
    let harness = Arc::new(Harness::ready(vec![running_worker("w1", "10.0.0.5")]));
    harness.fleet.set_mutation_delay(Duration::from_millis(50));

    let first = {
        let harness = Arc::clone(&harness);
        tokio::spawn(async move {
            harness
                .manager
                .pause_worker(&Harness::caller(), WorkerRequest::new("w1"))
                .await
        })
    };
    let second = {
        let harness = Arc::clone(&harness);
        tokio::spawn(async move {
            harness
                .manager
                .pause_worker(&Harness::caller(), WorkerRequest::new("w1"))
                .await
        })
    };

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();
    assert_eq!(harness.fleet.max_concurrent_mutations(), 1);
}
