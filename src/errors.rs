// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UniletError {
    /// Namespace or name missing from a workload spec.
    #[error("Invalid workload spec: {0}")]
    InvalidSpec(String),

    /// The addressed workload is not known to this node.
    #[error("Workload not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl UniletError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, UniletError::NotFound(_))
    }

    pub fn is_invalid_spec(&self) -> bool {
        matches!(self, UniletError::InvalidSpec(_))
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, UniletError>;
