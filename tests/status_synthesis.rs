use chrono::{Duration, TimeZone, Utc};

use unilet::exec::ExitOutcome;
use unilet::reconciler::status::{
    mark_deleted, mark_exited, mark_launch_failed, running_status, CONTAINER_DELETED_MESSAGE,
    CONTAINER_DELETED_REASON, DELETED_REASON,
};
use unilet::types::{ContainerState, Phase, WorkloadStatus};
use unilet_test_utils::builders::WorkloadSpecBuilder;

fn t0() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

#[test]
fn running_status_is_deterministic_given_now() {
    let spec = WorkloadSpecBuilder::new("default", "web")
        .with_containers(2, "img")
        .build();

    let status = running_status(&spec, "10.0.0.1", t0());

    assert_eq!(status.phase, Phase::Running);
    assert_eq!(status.start_time, Some(t0()));
    assert_eq!(status.host_ip, "10.0.0.1");
    assert_eq!(status.conditions.len(), 3);
    assert_eq!(status.container_statuses[1].name, "c1");
    assert_eq!(status.container_statuses[1].image, "img");
    assert_eq!(running_status(&spec, "10.0.0.1", t0()), status);
}

#[test]
fn workload_without_containers_has_no_container_statuses() {
    let spec = WorkloadSpecBuilder::new("default", "empty").build();
    let status = running_status(&spec, "10.0.0.1", t0());
    assert!(status.container_statuses.is_empty());
    assert_eq!(status.phase, Phase::Running);
}

#[test]
fn deletion_preserves_start_and_sets_finish() {
    let spec = WorkloadSpecBuilder::new("default", "web")
        .with_containers(1, "img")
        .build();
    let mut status = running_status(&spec, "10.0.0.1", t0());
    let later = t0() + Duration::seconds(30);

    mark_deleted(&mut status, later);

    assert_eq!(status.phase, Phase::Succeeded);
    assert_eq!(status.reason.as_deref(), Some(DELETED_REASON));
    assert_eq!(
        status.container_statuses[0].state,
        ContainerState::Terminated {
            started_at: t0(),
            finished_at: later,
            reason: CONTAINER_DELETED_REASON.to_string(),
            message: CONTAINER_DELETED_MESSAGE.to_string(),
            exit_code: None,
        }
    );
    // Conditions are never re-evaluated.
    assert!(status.conditions.iter().all(|c| c.status));
}

#[test]
fn deleting_a_status_without_containers_is_fine() {
    let mut status = WorkloadStatus::default();
    mark_deleted(&mut status, t0());
    assert_eq!(status.phase, Phase::Succeeded);
}

#[test]
fn exit_only_applies_to_running_workloads() {
    let spec = WorkloadSpecBuilder::new("default", "web")
        .with_containers(1, "img")
        .build();
    let mut status = running_status(&spec, "10.0.0.1", t0());
    mark_launch_failed(&mut status, "boom", t0());
    let failed = status.clone();

    assert!(!mark_exited(&mut status, ExitOutcome::Success, t0()));
    assert_eq!(status, failed);

    let mut pending = WorkloadStatus::default();
    assert!(!mark_exited(&mut pending, ExitOutcome::Success, t0()));
    assert_eq!(pending.phase, Phase::Pending);
}

#[test]
fn signal_exit_is_a_failure() {
    let spec = WorkloadSpecBuilder::new("default", "web")
        .with_containers(1, "img")
        .build();
    let mut status = running_status(&spec, "10.0.0.1", t0());

    assert!(mark_exited(&mut status, ExitOutcome::from_code(None), t0()));

    assert_eq!(status.phase, Phase::Failed);
    assert!(!status.container_statuses[0].ready);
    match &status.container_statuses[0].state {
        ContainerState::Terminated { exit_code, .. } => assert_eq!(*exit_code, Some(-1)),
        other => panic!("expected Terminated, got {other:?}"),
    }
}
