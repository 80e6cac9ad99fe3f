use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use unilet::exec::{CancelHandle, LaunchHandle, LaunchRequest, Launcher};

#[derive(Debug, Default)]
struct FakeLauncherState {
    fail_with: Option<String>,
    launched: Vec<LaunchRequest>,
    cancel_rxs: Vec<(u64, oneshot::Receiver<()>)>,
    cancelled: HashSet<u64>,
}

/// A fake launcher that:
/// - records every launch request
/// - never starts a process
/// - either "starts" successfully (handing out a real cancel handle whose
///   use can be observed) or fails with a configured message.
#[derive(Debug, Clone, Default)]
pub struct FakeLauncher {
    state: Arc<Mutex<FakeLauncherState>>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A launcher whose every start fails with `message`.
    pub fn failing(message: &str) -> Self {
        let launcher = Self::default();
        launcher.state.lock().unwrap().fail_with = Some(message.to_string());
        launcher
    }

    pub fn launched(&self) -> Vec<LaunchRequest> {
        self.state.lock().unwrap().launched.clone()
    }

    /// Whether the cancel handle of `launch_id` has been used.
    pub fn was_cancelled(&self, launch_id: u64) -> bool {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        for (id, rx) in state.cancel_rxs.iter_mut() {
            if rx.try_recv().is_ok() {
                state.cancelled.insert(*id);
            }
        }
        state.cancelled.contains(&launch_id)
    }
}

impl Launcher for FakeLauncher {
    fn launch(&self, request: LaunchRequest) -> LaunchHandle {
        let mut state = self.state.lock().unwrap();
        let launch_id = request.launch_id;
        state.launched.push(request);

        if let Some(message) = state.fail_with.clone() {
            return LaunchHandle::failed(message);
        }

        let (tx, rx) = oneshot::channel();
        state.cancel_rxs.push((launch_id, rx));
        LaunchHandle::started(CancelHandle::new(tx))
    }
}
