// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `unilet`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "unilet",
    version,
    about = "Run workload manifests as supervised processes on this node.",
    long_about = None
)]
pub struct CliArgs {
    /// Node and workload config (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Exit once every launched workload has reached a terminal phase,
    /// instead of waiting for Ctrl-C.
    #[arg(long)]
    pub once: bool,

    /// Log level for every target. Overrides `UNILET_LOG`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate the config, print the node description and each workload's
    /// launch recipe, and start nothing.
    #[arg(long, conflicts_with = "once")]
    pub dry_run: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// The level as an `EnvFilter` directive.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}
