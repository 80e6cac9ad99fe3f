// src/node.rs

//! Static description of this node: capacity, health conditions, addresses.
//!
//! None of this is tracked state; it is read from `[node]` and reported as
//! is.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::NodeSection;

/// A node health condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeCondition {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub status: bool,
    pub reason: &'static str,
    pub message: &'static str,
    pub last_heartbeat_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeAddress {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct NodeInfo {
    section: NodeSection,
}

impl NodeInfo {
    pub fn new(section: NodeSection) -> Self {
        Self { section }
    }

    pub fn name(&self) -> &str {
        &self.section.name
    }

    pub fn host_ip(&self) -> &str {
        &self.section.host_ip
    }

    pub fn operating_system(&self) -> &str {
        &self.section.operating_system
    }

    pub fn daemon_port(&self) -> u16 {
        self.section.daemon_port
    }

    /// Capacity and allocatable resources (identical on this node).
    pub fn capacity(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("cpu", self.section.cpu.clone()),
            ("memory", self.section.memory.clone()),
            ("pods", self.section.pods.clone()),
        ])
    }

    /// Health conditions: the node is always ready and never under pressure.
    pub fn conditions(&self) -> Vec<NodeCondition> {
        let now = Utc::now();
        let condition = |kind: &'static str,
                         status: bool,
                         reason: &'static str,
                         message: &'static str| NodeCondition {
            kind,
            status,
            reason,
            message,
            last_heartbeat_time: now,
        };

        vec![
            condition("Ready", true, "KubeletReady", "kubelet is ready."),
            condition(
                "OutOfDisk",
                false,
                "KubeletHasSufficientDisk",
                "kubelet has sufficient disk space available",
            ),
            condition(
                "MemoryPressure",
                false,
                "KubeletHasSufficientMemory",
                "kubelet has sufficient memory available",
            ),
            condition(
                "DiskPressure",
                false,
                "KubeletHasNoDiskPressure",
                "kubelet has no disk pressure",
            ),
            condition(
                "NetworkUnavailable",
                false,
                "RouteCreated",
                "RouteController created a route",
            ),
        ]
    }

    pub fn addresses(&self) -> Vec<NodeAddress> {
        vec![NodeAddress {
            kind: "InternalIP",
            address: self.section.internal_ip.clone(),
        }]
    }
}
