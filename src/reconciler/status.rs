// src/reconciler/status.rs

//! Pure status synthesis.
//!
//! Every status transition the reconciler performs is computed here, from
//! the current status, a timestamp and the triggering fact. No locks, no
//! Tokio, no processes: the functions are deterministic given `now`.

use chrono::{DateTime, Utc};

use crate::exec::ExitOutcome;
use crate::types::{
    Condition, ConditionType, ContainerState, ContainerStatus, Phase, WorkloadSpec,
    WorkloadStatus,
};

pub const DELETED_REASON: &str = "ProviderDeleted";
pub const CONTAINER_DELETED_REASON: &str = "ProviderPodContainerDeleted";
pub const CONTAINER_DELETED_MESSAGE: &str = "provider terminated container upon deletion";
pub const LAUNCH_FAILURE_REASON: &str = "LaunchFailure";
pub const EXIT_COMPLETED_REASON: &str = "Completed";
pub const EXIT_ERROR_REASON: &str = "Error";

/// Initial status of a freshly created workload.
///
/// Phase `Running`, `start_time = now`, the three creation conditions set to
/// true, and one ready, running container status per container.
pub fn running_status(spec: &WorkloadSpec, host_ip: &str, now: DateTime<Utc>) -> WorkloadStatus {
    let conditions = [
        ConditionType::Initialized,
        ConditionType::Ready,
        ConditionType::Scheduled,
    ]
    .into_iter()
    .map(|kind| Condition { kind, status: true })
    .collect();

    let container_statuses = spec
        .containers
        .iter()
        .map(|container| ContainerStatus {
            name: container.name.clone(),
            image: container.image.clone(),
            ready: true,
            restart_count: 0,
            state: ContainerState::Running { started_at: now },
        })
        .collect();

    WorkloadStatus {
        phase: Phase::Running,
        reason: None,
        message: None,
        host_ip: host_ip.to_string(),
        pod_ip: String::new(),
        start_time: Some(now),
        conditions,
        container_statuses,
    }
}

/// Transition a removed workload to its terminal, deleted status.
///
/// Running containers become terminated with their start time preserved.
/// Containers that already terminated keep their terminated state.
pub fn mark_deleted(status: &mut WorkloadStatus, now: DateTime<Utc>) {
    status.phase = Phase::Succeeded;
    status.reason = Some(DELETED_REASON.to_string());

    for container in &mut status.container_statuses {
        container.ready = false;
        if let ContainerState::Running { started_at } = container.state {
            container.state = ContainerState::Terminated {
                started_at,
                finished_at: now,
                reason: CONTAINER_DELETED_REASON.to_string(),
                message: CONTAINER_DELETED_MESSAGE.to_string(),
                exit_code: None,
            };
        }
    }
}

/// Record that the workload's process could not be started.
pub fn mark_launch_failed(status: &mut WorkloadStatus, error: &str, now: DateTime<Utc>) {
    status.phase = Phase::Failed;
    status.reason = Some(LAUNCH_FAILURE_REASON.to_string());
    status.message = Some(error.to_string());
    terminate_running(status, now, LAUNCH_FAILURE_REASON, error, None);
}

/// Derive the terminal phase from a process exit.
///
/// Exit code 0 means `Succeeded`, anything else `Failed`. Returns whether
/// the status changed; a workload that is not running is left alone.
pub fn mark_exited(status: &mut WorkloadStatus, outcome: ExitOutcome, now: DateTime<Utc>) -> bool {
    if status.phase != Phase::Running {
        return false;
    }

    let code = outcome.code();
    let (phase, reason) = match outcome {
        ExitOutcome::Success => (Phase::Succeeded, EXIT_COMPLETED_REASON),
        ExitOutcome::Failed(_) => (Phase::Failed, EXIT_ERROR_REASON),
    };
    let message = format!("process exited with code {code}");

    status.phase = phase;
    status.reason = Some(reason.to_string());
    status.message = Some(message.clone());
    terminate_running(status, now, reason, &message, Some(code));
    true
}

fn terminate_running(
    status: &mut WorkloadStatus,
    now: DateTime<Utc>,
    reason: &str,
    message: &str,
    exit_code: Option<i32>,
) {
    for container in &mut status.container_statuses {
        if let ContainerState::Running { started_at } = container.state {
            container.ready = false;
            container.state = ContainerState::Terminated {
                started_at,
                finished_at: now,
                reason: reason.to_string(),
                message: message.to_string(),
                exit_code,
            };
        }
    }
}
