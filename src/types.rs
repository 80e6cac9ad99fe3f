// src/types.rs

//! Workload data model shared by the store, the reconciler and the launcher.
//!
//! A [`WorkloadSpec`] is what callers hand in (the desired state). The store
//! keeps a [`WorkloadRecord`], which is the spec plus a synthesized
//! [`WorkloadStatus`].

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, UniletError};

/// A single `NAME=value` environment entry of a container.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// Resource intent of a container.
///
/// Purely descriptive: nothing on this node enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceIntent {
    #[serde(default)]
    pub cpu: Option<String>,
    #[serde(default)]
    pub memory: Option<String>,
}

/// One container (a unikernel process) inside a workload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContainerSpec {
    #[serde(default)]
    pub name: String,

    /// Image reference, resolved to an executable by an
    /// [`ImageResolver`](crate::exec::ImageResolver).
    pub image: String,

    #[serde(default)]
    pub env: Vec<EnvVar>,

    #[serde(default)]
    pub resources: Option<ResourceIntent>,
}

/// Declarative description of a workload ("pod") assigned to this node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkloadSpec {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub containers: Vec<ContainerSpec>,
}

impl WorkloadSpec {
    /// Derive the store key for this spec.
    pub fn key(&self) -> Result<WorkloadKey> {
        WorkloadKey::new(&self.namespace, &self.name)
    }
}

/// Store key of a workload, rendered as `namespace-name`.
///
/// Equality and hashing use the `(namespace, name)` pair, so two pairs that
/// render to the same string still address different records.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct WorkloadKey {
    namespace: String,
    name: String,
}

impl WorkloadKey {
    /// Build a key, rejecting an empty namespace or name.
    pub fn new(namespace: &str, name: &str) -> Result<Self> {
        if namespace.is_empty() {
            return Err(UniletError::InvalidSpec(
                "workload namespace not found".to_string(),
            ));
        }
        if name.is_empty() {
            return Err(UniletError::InvalidSpec(format!(
                "workload name not found (namespace '{namespace}')"
            )));
        }
        Ok(Self::from_names(namespace, name))
    }

    /// Build a key without validation. Only used for lookups, where an
    /// empty part simply never matches a stored record.
    pub(crate) fn from_names(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for WorkloadKey {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.name == other.name
    }
}

impl Hash for WorkloadKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Display for WorkloadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.namespace, self.name)
    }
}

/// Coarse lifecycle stage of a workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl Phase {
    /// `Succeeded` and `Failed` are terminal.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Succeeded | Phase::Failed)
    }
}

/// Lifecycle milestones attached to a workload at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionType {
    Initialized,
    Ready,
    Scheduled,
}

/// A named boolean fact about a workload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub kind: ConditionType,
    pub status: bool,
}

/// State of one container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    Running {
        started_at: DateTime<Utc>,
    },
    Terminated {
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        reason: String,
        message: String,
        /// Process exit code, when the termination came from a real exit.
        exit_code: Option<i32>,
    },
}

impl ContainerState {
    pub fn started_at(&self) -> DateTime<Utc> {
        match self {
            ContainerState::Running { started_at }
            | ContainerState::Terminated { started_at, .. } => *started_at,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ContainerState::Running { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerStatus {
    pub name: String,
    pub image: String,
    pub ready: bool,
    /// Always 0: no restart policy is implemented.
    pub restart_count: u32,
    pub state: ContainerState,
}

/// Synthesized status of a workload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkloadStatus {
    pub phase: Phase,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub host_ip: String,
    #[serde(default)]
    pub pod_ip: String,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub container_statuses: Vec<ContainerStatus>,
}

/// What the node believes about one workload: spec plus status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadRecord {
    pub spec: WorkloadSpec,
    pub status: WorkloadStatus,
}

impl WorkloadRecord {
    pub fn new(spec: WorkloadSpec, status: WorkloadStatus) -> Self {
        Self { spec, status }
    }

    pub fn namespace(&self) -> &str {
        &self.spec.namespace
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn phase(&self) -> Phase {
        self.status.phase
    }
}
