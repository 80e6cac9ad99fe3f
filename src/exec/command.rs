// src/exec/command.rs

//! Turning a workload spec into a launch recipe.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, warn};

use crate::exec::resolver::ImageResolver;
use crate::types::WorkloadSpec;

/// Program and arguments of the default recipe: a bare TCP listener, handy
/// for smoke-testing a node.
pub const DEFAULT_PROGRAM: &str = "ncat";
pub const DEFAULT_ARGS: [&str; 2] = ["-l", "8080"];

/// Concrete command to run for a workload.
///
/// Executed as an argument vector, never through a shell, so spec-provided
/// values cannot inject shell syntax. `Display` renders the space-joined
/// command line for logs and dry runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchRecipe {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl LaunchRecipe {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// The fallback recipe (`ncat -l 8080`).
    pub fn fallback() -> Self {
        Self::new(
            DEFAULT_PROGRAM,
            DEFAULT_ARGS.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl fmt::Display for LaunchRecipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Build the launch recipe for `spec`.
///
/// Only the first container and its first environment entry are consulted;
/// multi-container workloads still map to a single process. An empty spec,
/// a spec without containers, or an image the resolver cannot find all yield
/// [`LaunchRecipe::fallback`]. A failed start of the resolved program shows
/// up later as a failed workload, so nothing here returns an error.
pub fn build_command(spec: &WorkloadSpec, resolver: &dyn ImageResolver) -> LaunchRecipe {
    if *spec == WorkloadSpec::default() {
        debug!("empty workload spec; using fallback recipe");
        return LaunchRecipe::fallback();
    }

    let Some(container) = spec.containers.first() else {
        debug!(
            namespace = %spec.namespace,
            name = %spec.name,
            "workload has no containers; using fallback recipe"
        );
        return LaunchRecipe::fallback();
    };

    let path = match resolver.resolve(&container.image) {
        Ok(path) => path,
        Err(e) => {
            // TODO: fetch the executable from an image registry instead.
            warn!(
                namespace = %spec.namespace,
                name = %spec.name,
                image = %container.image,
                error = %e,
                "could not resolve image; using fallback recipe"
            );
            return LaunchRecipe::fallback();
        }
    };

    let args = container
        .env
        .first()
        .map(|env| vec![format!("--{}={}", env.name, env.value)])
        .unwrap_or_default();

    LaunchRecipe::new(path, args)
}
