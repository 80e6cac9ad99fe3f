// src/reconciler/mod.rs

//! Lifecycle reconciler.
//!
//! Translates desired-state operations (create, update, delete) into store
//! mutations, synthesizes status, and drives the launcher:
//! - [`status`] holds the pure status transitions.
//! - [`notifier`] defines the change-notification seam.
//! - [`supervisor`] feeds process exits back into the reconciler.
//!
//! Declaring a workload (`create`) and spawning its process (`launch`) are
//! separate steps: the process can fail to start after the record already
//! committed, and that failure is reported through the record's phase.

pub mod notifier;
pub mod status;
pub mod supervisor;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::errors::{Result, UniletError};
use crate::exec::{build_command, ExitOutcome, ImageResolver, LaunchRecipe, LaunchRequest, Launcher};
use crate::store::{ProcessAttachment, WorkloadStore};
use crate::types::{WorkloadKey, WorkloadRecord, WorkloadSpec, WorkloadStatus};

pub use notifier::{NoopNotifier, Notifier};
pub use supervisor::spawn_exit_supervisor;

/// Host-facing lifecycle operations.
///
/// Any host (an orchestrator API, the bundled CLI, a test) adapts to this
/// trait: build a [`WorkloadSpec`] from its own types, call in, translate the
/// result back.
pub trait LifecycleReconciler: Send + Sync {
    /// Declare a workload as running and store it.
    fn create(&self, spec: WorkloadSpec) -> Result<WorkloadRecord>;

    /// Replace the stored spec of a workload.
    fn update(&self, spec: WorkloadSpec) -> Result<WorkloadRecord>;

    /// Remove a workload, returning its final (terminated) record.
    fn delete(&self, spec: &WorkloadSpec) -> Result<WorkloadRecord>;

    fn get(&self, namespace: &str, name: &str) -> Result<WorkloadRecord>;

    fn list(&self) -> Vec<WorkloadRecord>;

    fn get_status(&self, namespace: &str, name: &str) -> Result<WorkloadStatus> {
        self.get(namespace, name).map(|record| record.status)
    }
}

/// Outcome of [`Reconciler::launch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchReport {
    pub launch_id: u64,
    pub recipe: LaunchRecipe,
    pub started: bool,
}

/// Reconciler over an image resolver `R` and a launcher `L`.
pub struct Reconciler<R, L> {
    store: WorkloadStore,
    resolver: R,
    launcher: L,
    notifier: Arc<dyn Notifier>,
    host_ip: String,
    next_launch_id: AtomicU64,
}

impl<R, L> fmt::Debug for Reconciler<R, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("store", &self.store)
            .field("host_ip", &self.host_ip)
            .finish_non_exhaustive()
    }
}

impl<R: ImageResolver, L: Launcher> Reconciler<R, L> {
    /// Create a reconciler with an empty store and a no-op notifier.
    ///
    /// `host_ip` is the static node address reported in every status.
    pub fn new(resolver: R, launcher: L, host_ip: impl Into<String>) -> Self {
        Self {
            store: WorkloadStore::new(),
            resolver,
            launcher,
            notifier: Arc::new(NoopNotifier),
            host_ip: host_ip.into(),
            next_launch_id: AtomicU64::new(0),
        }
    }

    /// Install the change notifier. Only possible before the reconciler is
    /// shared, so the notifier never changes while operations run.
    pub fn with_notifier<N: Notifier + 'static>(mut self, notifier: N) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    pub fn store(&self) -> &WorkloadStore {
        &self.store
    }

    /// Build the launch recipe for a stored workload and start it.
    ///
    /// A start failure is not an error: the workload's phase becomes
    /// `Failed` and the returned report has `started = false`. A process
    /// already attached to the workload is cancelled and replaced.
    pub fn launch(&self, namespace: &str, name: &str) -> Result<LaunchReport> {
        let key = WorkloadKey::new(namespace, name)?;
        let spec = self
            .store
            .get(&key)
            .map(|record| record.spec)
            .ok_or_else(|| not_found(namespace, name))?;

        let recipe = build_command(&spec, &self.resolver);
        let launch_id = self.next_launch_id.fetch_add(1, Ordering::Relaxed) + 1;

        // The launch id must be attached before the process runs: its exit
        // can reach `record_exit` before `launcher.launch` returns.
        let previous = self
            .store
            .update(&key, |entry| {
                entry
                    .process
                    .replace(ProcessAttachment::reserved(launch_id))
            })
            .ok_or_else(|| not_found(namespace, name))?;
        if let Some(previous) = previous {
            info!(
                key = %key,
                previous_launch_id = previous.launch_id,
                "replacing previously attached process"
            );
            previous.stop();
        }

        info!(key = %key, launch_id, cmd = %recipe, "launching workload");

        let handle = self.launcher.launch(LaunchRequest {
            key: key.clone(),
            launch_id,
            recipe: recipe.clone(),
        });

        if !handle.started {
            let error = handle
                .error
                .unwrap_or_else(|| "process failed to start".to_string());
            warn!(key = %key, launch_id, error = %error, "marking workload Failed");

            let updated = self
                .store
                .update(&key, |entry| {
                    if entry.launch_id() != Some(launch_id) {
                        return None;
                    }
                    entry.process = None;
                    status::mark_launch_failed(&mut entry.record.status, &error, Utc::now());
                    Some(entry.record.clone())
                })
                .flatten();
            if let Some(record) = updated {
                self.notifier.notify(&record);
            }

            return Ok(LaunchReport {
                launch_id,
                recipe,
                started: false,
            });
        }

        let mut cancel = Some(handle.cancel);
        self.store.update(&key, |entry| {
            if let Some(process) = entry.process.as_mut().filter(|p| p.launch_id == launch_id) {
                process.cancel = cancel.take();
            }
        });

        // Not attached: the workload was deleted or relaunched meanwhile, or
        // the process already exited.
        if let Some(cancel) = cancel {
            debug!(key = %key, launch_id, "process detached before launch returned; cancelling");
            cancel.cancel();
        }

        Ok(LaunchReport {
            launch_id,
            recipe,
            started: true,
        })
    }

    /// Apply a process exit to the workload it was launched for.
    ///
    /// Exits of processes that are no longer attached (stale launch ids,
    /// deleted workloads) are ignored. Returns whether the record changed.
    pub fn record_exit(&self, key: &WorkloadKey, launch_id: u64, outcome: ExitOutcome) -> bool {
        let updated = self
            .store
            .update(key, |entry| {
                if entry.launch_id() != Some(launch_id) {
                    return None;
                }
                entry.process = None;
                status::mark_exited(&mut entry.record.status, outcome, Utc::now())
                    .then(|| entry.record.clone())
            })
            .flatten();

        match updated {
            Some(record) => {
                info!(
                    key = %key,
                    launch_id,
                    exit_code = outcome.code(),
                    phase = ?record.status.phase,
                    "workload process exit recorded"
                );
                self.notifier.notify(&record);
                true
            }
            None => {
                debug!(key = %key, launch_id, "ignoring exit of detached process");
                false
            }
        }
    }

    /// Whether every stored workload reached a terminal phase.
    pub fn all_terminal(&self) -> bool {
        self.store
            .list()
            .iter()
            .all(|record| record.status.phase.is_terminal())
    }
}

impl<R: ImageResolver, L: Launcher> LifecycleReconciler for Reconciler<R, L> {
    fn create(&self, spec: WorkloadSpec) -> Result<WorkloadRecord> {
        let key = spec.key()?;
        info!(namespace = %spec.namespace, name = %spec.name, "receive create");

        let status = status::running_status(&spec, &self.host_ip, Utc::now());
        let record = WorkloadRecord::new(spec, status);
        self.store.put(key, record.clone());

        self.notifier.notify(&record);
        Ok(record)
    }

    fn update(&self, spec: WorkloadSpec) -> Result<WorkloadRecord> {
        let key = spec.key()?;
        info!(namespace = %spec.namespace, name = %spec.name, "receive update");

        // The synthesized status is kept; only the desired spec is replaced.
        let inserted_spec = spec.clone();
        let record = self.store.upsert_with(
            key,
            || WorkloadRecord::new(inserted_spec, WorkloadStatus::default()),
            |entry| {
                entry.record.spec = spec;
                entry.record.clone()
            },
        );

        self.notifier.notify(&record);
        Ok(record)
    }

    fn delete(&self, spec: &WorkloadSpec) -> Result<WorkloadRecord> {
        let key = spec.key()?;
        info!(namespace = %spec.namespace, name = %spec.name, "receive delete");

        let entry = self
            .store
            .remove(&key)
            .ok_or_else(|| not_found(&spec.namespace, &spec.name))?;

        if let Some(process) = entry.process {
            debug!(key = %key, launch_id = process.launch_id, "cancelling attached process");
            process.stop();
        }

        let mut record = entry.record;
        status::mark_deleted(&mut record.status, Utc::now());

        self.notifier.notify(&record);
        Ok(record)
    }

    fn get(&self, namespace: &str, name: &str) -> Result<WorkloadRecord> {
        debug!(namespace, name, "receive get");
        self.store
            .get(&WorkloadKey::from_names(namespace, name))
            .ok_or_else(|| not_found(namespace, name))
    }

    fn list(&self) -> Vec<WorkloadRecord> {
        debug!("receive list");
        self.store.list()
    }
}

fn not_found(namespace: &str, name: &str) -> UniletError {
    UniletError::NotFound(format!(
        "workload \"{namespace}/{name}\" is not known to this node"
    ))
}
