// src/config/validate.rs

use std::collections::HashSet;
use std::net::IpAddr;

use crate::config::model::{ConfigFile, NodeSection, RawConfigFile};
use crate::errors::{Result, UniletError};
use crate::types::WorkloadSpec;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::UniletError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.node, raw.launcher, raw.workload))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_node(&cfg.node)?;
    validate_workloads(&cfg.workload)?;
    Ok(())
}

fn validate_node(node: &NodeSection) -> Result<()> {
    if node.name.trim().is_empty() {
        return Err(UniletError::ConfigError(
            "[node].name must not be empty".to_string(),
        ));
    }

    for (field, value) in [("host_ip", &node.host_ip), ("internal_ip", &node.internal_ip)] {
        if value.parse::<IpAddr>().is_err() {
            return Err(UniletError::ConfigError(format!(
                "[node].{field} is not a valid IP address: '{value}'"
            )));
        }
    }

    for (field, value) in [("cpu", &node.cpu), ("memory", &node.memory), ("pods", &node.pods)] {
        if value.trim().is_empty() {
            return Err(UniletError::ConfigError(format!(
                "[node].{field} capacity must not be empty"
            )));
        }
    }

    Ok(())
}

fn validate_workloads(workloads: &[WorkloadSpec]) -> Result<()> {
    let mut seen = HashSet::new();

    for (idx, spec) in workloads.iter().enumerate() {
        let key = spec.key().map_err(|e| {
            UniletError::ConfigError(format!("[[workload]] #{}: {e}", idx + 1))
        })?;

        if !seen.insert(key.clone()) {
            return Err(UniletError::ConfigError(format!(
                "workload '{key}' is declared more than once"
            )));
        }

        if spec.containers.is_empty() {
            return Err(UniletError::ConfigError(format!(
                "workload '{key}' must declare at least one container"
            )));
        }

        for container in &spec.containers {
            if container.image.trim().is_empty() {
                return Err(UniletError::ConfigError(format!(
                    "workload '{key}': container '{}' has an empty image",
                    container.name
                )));
            }
        }
    }

    Ok(())
}
