// src/exec/backend.rs

//! Pluggable launcher abstraction.
//!
//! The reconciler talks to a `Launcher` instead of spawning processes itself.
//! Production code uses [`ProcessLauncher`](super::ProcessLauncher); tests
//! can provide a launcher that records requests and never touches the OS.

use tokio::sync::oneshot;
use tracing::debug;

use crate::exec::command::LaunchRecipe;
use crate::types::WorkloadKey;

/// One request to start a workload's process.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    pub key: WorkloadKey,
    /// Identifies this launch among all launches of the same key.
    pub launch_id: u64,
    pub recipe: LaunchRecipe,
}

/// How a launched process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Success,
    /// Non-zero exit code, or -1 when killed by a signal.
    Failed(i32),
}

impl ExitOutcome {
    pub fn from_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => ExitOutcome::Success,
            Some(code) => ExitOutcome::Failed(code),
            None => ExitOutcome::Failed(-1),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            ExitOutcome::Success => 0,
            ExitOutcome::Failed(code) => code,
        }
    }
}

/// Events flowing from launched processes back to the reconciler.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    /// A process exited on its own (cancelled processes report nothing).
    Exited {
        key: WorkloadKey,
        launch_id: u64,
        outcome: ExitOutcome,
    },
}

/// Handle that stops a launched process.
///
/// Dropping the handle without calling [`cancel`](Self::cancel) leaves the
/// process running.
#[derive(Debug, Default)]
pub struct CancelHandle {
    tx: Option<oneshot::Sender<()>>,
}

impl CancelHandle {
    pub fn new(tx: oneshot::Sender<()>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A handle that does nothing, returned when a start failed.
    pub fn noop() -> Self {
        Self { tx: None }
    }

    /// Request the process to be killed. Returns whether a live process was
    /// signalled.
    pub fn cancel(mut self) -> bool {
        match self.tx.take() {
            Some(tx) => {
                let delivered = tx.send(()).is_ok();
                if !delivered {
                    debug!("cancel requested but process already finished");
                }
                delivered
            }
            None => false,
        }
    }
}

/// Result of a launch attempt.
#[derive(Debug)]
pub struct LaunchHandle {
    pub cancel: CancelHandle,
    pub started: bool,
    /// Why the start failed, when `started` is false.
    pub error: Option<String>,
}

impl LaunchHandle {
    pub fn started(cancel: CancelHandle) -> Self {
        Self {
            cancel,
            started: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            cancel: CancelHandle::noop(),
            started: false,
            error: Some(error.into()),
        }
    }
}

/// Trait abstracting how workload processes are started.
///
/// Starting is synchronous; waiting for the process must happen on a
/// background task so `launch` never blocks on the process itself.
pub trait Launcher: Send + Sync {
    fn launch(&self, request: LaunchRequest) -> LaunchHandle;
}
