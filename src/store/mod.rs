// src/store/mod.rs

//! In-memory workload store.
//!
//! The single source of truth for what this node believes it is running.
//! One mutex guards the whole map; every operation holds it for exactly one
//! map access, so concurrent callers never observe a half-applied mutation.
//! Nothing here survives a restart.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::exec::CancelHandle;
use crate::types::{WorkloadKey, WorkloadRecord};

/// The process currently attached to a workload.
///
/// The launch id is attached before the process is started; `cancel` is
/// filled in once the launcher hands it back.
#[derive(Debug)]
pub struct ProcessAttachment {
    pub launch_id: u64,
    pub cancel: Option<CancelHandle>,
}

impl ProcessAttachment {
    /// Attachment for a launch whose process is not started yet.
    pub fn reserved(launch_id: u64) -> Self {
        Self {
            launch_id,
            cancel: None,
        }
    }

    /// Kill the attached process, if its handle arrived. Returns whether a
    /// live process was signalled.
    pub fn stop(self) -> bool {
        self.cancel.is_some_and(CancelHandle::cancel)
    }
}

/// What the store keeps per key: the record plus its process, if any.
#[derive(Debug)]
pub struct WorkloadEntry {
    pub record: WorkloadRecord,
    pub process: Option<ProcessAttachment>,
}

impl WorkloadEntry {
    pub fn new(record: WorkloadRecord) -> Self {
        Self {
            record,
            process: None,
        }
    }

    /// Launch id of the attached process, if any.
    pub fn launch_id(&self) -> Option<u64> {
        self.process.as_ref().map(|p| p.launch_id)
    }
}

#[derive(Debug, Default)]
pub struct WorkloadStore {
    entries: Mutex<HashMap<WorkloadKey, WorkloadEntry>>,
}

impl WorkloadStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<WorkloadKey, WorkloadEntry>> {
        // A panicking notifier can't poison this lock (it runs outside it),
        // so the map is consistent even if poisoned.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace the record under `key`.
    ///
    /// An already attached process stays attached.
    pub fn put(&self, key: WorkloadKey, record: WorkloadRecord) {
        let mut entries = self.lock();
        match entries.get_mut(&key) {
            Some(entry) => {
                debug!(key = %key, "replacing stored workload record");
                entry.record = record;
            }
            None => {
                debug!(key = %key, "storing new workload record");
                entries.insert(key, WorkloadEntry::new(record));
            }
        }
    }

    /// Snapshot of the record under `key`.
    pub fn get(&self, key: &WorkloadKey) -> Option<WorkloadRecord> {
        self.lock().get(key).map(|entry| entry.record.clone())
    }

    /// Remove `key`, handing back the entry (record and process).
    pub fn remove(&self, key: &WorkloadKey) -> Option<WorkloadEntry> {
        self.lock().remove(key)
    }

    /// Run `f` on the entry under `key` while holding the lock.
    ///
    /// Returns `None` when the key is absent.
    pub fn update<T>(
        &self,
        key: &WorkloadKey,
        f: impl FnOnce(&mut WorkloadEntry) -> T,
    ) -> Option<T> {
        self.lock().get_mut(key).map(f)
    }

    /// Like [`update`](Self::update), inserting `insert()` first when the
    /// key is absent.
    pub fn upsert_with<T>(
        &self,
        key: WorkloadKey,
        insert: impl FnOnce() -> WorkloadRecord,
        f: impl FnOnce(&mut WorkloadEntry) -> T,
    ) -> T {
        let mut entries = self.lock();
        let entry = entries
            .entry(key)
            .or_insert_with(|| WorkloadEntry::new(insert()));
        f(entry)
    }

    /// Snapshots of every stored record, in no particular order.
    pub fn list(&self) -> Vec<WorkloadRecord> {
        self.lock()
            .values()
            .map(|entry| entry.record.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
