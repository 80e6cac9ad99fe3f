// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::WorkloadSpec;

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [node]
/// name = "unilet-node"
/// host_ip = "192.168.1.147"
///
/// [launcher]
/// search_path = ["/opt/unikernels"]
///
/// [[workload]]
/// namespace = "default"
/// name = "web"
///
/// [[workload.containers]]
/// name = "echo"
/// image = "echo-server"
/// env = [{ name = "FOO", value = "bar" }]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub node: NodeSection,

    #[serde(default)]
    pub launcher: LauncherSection,

    /// Workloads to create and launch at startup, from `[[workload]]`.
    #[serde(default)]
    pub workload: Vec<WorkloadSpec>,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub node: NodeSection,
    pub launcher: LauncherSection,
    pub workload: Vec<WorkloadSpec>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        node: NodeSection,
        launcher: LauncherSection,
        workload: Vec<WorkloadSpec>,
    ) -> Self {
        Self {
            node,
            launcher,
            workload,
        }
    }
}

/// `[node]` section: static description of this node.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeSection {
    #[serde(default = "default_node_name")]
    pub name: String,

    #[serde(default = "default_operating_system")]
    pub operating_system: String,

    #[serde(default = "default_ip")]
    pub internal_ip: String,

    /// Address reported as `host_ip` in every workload status.
    #[serde(default = "default_ip")]
    pub host_ip: String,

    #[serde(default = "default_daemon_port")]
    pub daemon_port: u16,

    #[serde(default = "default_cpu")]
    pub cpu: String,

    #[serde(default = "default_memory")]
    pub memory: String,

    #[serde(default = "default_pods")]
    pub pods: String,
}

fn default_node_name() -> String {
    "unilet-node".to_string()
}

fn default_operating_system() -> String {
    "Linux".to_string()
}

fn default_ip() -> String {
    "127.0.0.1".to_string()
}

fn default_daemon_port() -> u16 {
    10250
}

fn default_cpu() -> String {
    "20".to_string()
}

fn default_memory() -> String {
    "100Gi".to_string()
}

fn default_pods() -> String {
    "20".to_string()
}

impl Default for NodeSection {
    fn default() -> Self {
        Self {
            name: default_node_name(),
            operating_system: default_operating_system(),
            internal_ip: default_ip(),
            host_ip: default_ip(),
            daemon_port: default_daemon_port(),
            cpu: default_cpu(),
            memory: default_memory(),
            pods: default_pods(),
        }
    }
}

/// `[launcher]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LauncherSection {
    /// Directories searched for image executables. If `None`, `$PATH` is
    /// used.
    #[serde(default)]
    pub search_path: Option<Vec<PathBuf>>,
}
