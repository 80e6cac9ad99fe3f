// src/reconciler/notifier.rs

//! Change notification.

use crate::types::WorkloadRecord;

/// Receives every workload record right after a successful mutation.
///
/// Called synchronously on the mutating caller's thread, outside the store
/// lock, so an implementation may read back from the reconciler.
pub trait Notifier: Send + Sync {
    fn notify(&self, record: &WorkloadRecord);
}

impl<F> Notifier for F
where
    F: Fn(&WorkloadRecord) + Send + Sync,
{
    fn notify(&self, record: &WorkloadRecord) {
        self(record)
    }
}

/// Default notifier: drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _record: &WorkloadRecord) {}
}
