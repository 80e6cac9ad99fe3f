// src/exec/mod.rs

//! Process execution layer.
//!
//! This module turns workload specs into processes, using
//! `tokio::process::Command`, and reports process exits back to the
//! reconciler via `ProcessEvent`s.
//!
//! - [`resolver`] resolves image references to executables.
//! - [`command`] builds the launch recipe for a workload.
//! - [`backend`] provides the `Launcher` trait and the handle types shared by
//!   every launcher, so tests can swap in a fake.
//! - [`launcher`] is the production `ProcessLauncher`.

pub mod backend;
pub mod command;
pub mod launcher;
pub mod resolver;

pub use backend::{
    CancelHandle, ExitOutcome, LaunchHandle, LaunchRequest, Launcher, ProcessEvent,
};
pub use command::{build_command, LaunchRecipe};
pub use launcher::ProcessLauncher;
pub use resolver::{ImageResolver, PathResolver};
