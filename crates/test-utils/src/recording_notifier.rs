use std::sync::{Arc, Mutex};

use unilet::reconciler::Notifier;
use unilet::types::WorkloadRecord;

/// Test spy: remembers every record it was notified with.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<WorkloadRecord>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<WorkloadRecord> {
        self.seen.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn last(&self) -> Option<WorkloadRecord> {
        self.seen.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, record: &WorkloadRecord) {
        self.seen.lock().unwrap().push(record.clone());
    }
}
