// src/exec/launcher.rs

//! Real process launcher backed by `tokio::process`.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::exec::backend::{
    CancelHandle, ExitOutcome, LaunchHandle, LaunchRequest, Launcher, ProcessEvent,
};
use crate::types::WorkloadKey;

/// Launcher that starts each recipe as a child process of this node.
///
/// Every started process gets its own reaper task, detached from whoever
/// called [`launch`](Launcher::launch), so the process outlives the request
/// that created it. Exits are reported on the `events` channel.
///
/// `launch` must be called from within a Tokio runtime.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    events: mpsc::Sender<ProcessEvent>,
}

impl ProcessLauncher {
    pub fn new(events: mpsc::Sender<ProcessEvent>) -> Self {
        Self { events }
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&self, request: LaunchRequest) -> LaunchHandle {
        info!(
            key = %request.key,
            launch_id = request.launch_id,
            cmd = %request.recipe,
            "starting workload process"
        );

        let mut cmd = Command::new(&request.recipe.program);
        cmd.args(&request.recipe.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(
                    key = %request.key,
                    launch_id = request.launch_id,
                    error = %e,
                    "couldn't start workload process"
                );
                return LaunchHandle::failed(format!(
                    "starting '{}': {e}",
                    request.recipe
                ));
            }
        };

        // Always consume output so pipe buffers don't fill; log at debug.
        if let Some(stdout) = child.stdout.take() {
            drain_lines(request.key.clone(), "stdout", stdout);
        }
        if let Some(stderr) = child.stderr.take() {
            drain_lines(request.key.clone(), "stderr", stderr);
        }

        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        tokio::spawn(reap(
            child,
            request.key,
            request.launch_id,
            self.events.clone(),
            cancel_rx,
        ));

        LaunchHandle::started(CancelHandle::new(cancel_tx))
    }
}

fn drain_lines<R>(key: WorkloadKey, stream: &'static str, reader: R)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            debug!(key = %key, stream, "{}", line);
        }
    });
}

/// Wait for the child to exit, or kill it when cancellation is requested.
///
/// A cancelled instance reports nothing. Wait errors are logged only.
async fn reap(
    mut child: Child,
    key: WorkloadKey,
    launch_id: u64,
    events: mpsc::Sender<ProcessEvent>,
    mut cancel_rx: oneshot::Receiver<()>,
) {
    let status = tokio::select! {
        status = child.wait() => status,
        cancel = &mut cancel_rx => match cancel {
            Ok(()) => {
                info!(key = %key, launch_id, "cancellation requested; killing process");
                if let Err(e) = child.kill().await {
                    warn!(key = %key, launch_id, error = %e, "failed to kill process");
                }
                return;
            }
            Err(_) => {
                // Handle dropped without cancelling: keep the process.
                debug!(key = %key, launch_id, "cancel handle dropped; still waiting on process");
                child.wait().await
            }
        }
    };

    let status = match status {
        Ok(status) => status,
        Err(e) => {
            warn!(key = %key, launch_id, error = %e, "waiting on process failed");
            return;
        }
    };

    let outcome = ExitOutcome::from_code(status.code());
    info!(
        key = %key,
        launch_id,
        exit_code = outcome.code(),
        success = status.success(),
        "workload process exited"
    );

    if events
        .send(ProcessEvent::Exited {
            key: key.clone(),
            launch_id,
            outcome,
        })
        .await
        .is_err()
    {
        debug!(key = %key, launch_id, "process event channel closed; exit not reported");
    }
}
