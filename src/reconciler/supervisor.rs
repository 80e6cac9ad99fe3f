// src/reconciler/supervisor.rs

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::exec::{ImageResolver, Launcher, ProcessEvent};

use super::Reconciler;

/// Spawn the loop that applies process exits to the reconciler's store.
///
/// Runs until every sender of `events` is dropped.
pub fn spawn_exit_supervisor<R, L>(
    reconciler: Arc<Reconciler<R, L>>,
    mut events: mpsc::Receiver<ProcessEvent>,
) -> JoinHandle<()>
where
    R: ImageResolver + 'static,
    L: Launcher + 'static,
{
    tokio::spawn(async move {
        info!("exit supervisor started");

        while let Some(event) = events.recv().await {
            debug!(?event, "supervisor received process event");
            match event {
                ProcessEvent::Exited {
                    key,
                    launch_id,
                    outcome,
                } => {
                    reconciler.record_exit(&key, launch_id, outcome);
                }
            }
        }

        info!("exit supervisor finished (channel closed)");
    })
}
