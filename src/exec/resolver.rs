// src/exec/resolver.rs

//! Resolving an image reference to an executable on this node.

use std::env;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use tracing::debug;

/// Capability that turns an image reference into an executable path.
///
/// Any error makes the command builder fall back to its default recipe.
pub trait ImageResolver: Send + Sync + Debug {
    fn resolve(&self, image: &str) -> Result<PathBuf>;
}

/// Looks images up as executables on a search path.
///
/// Without an explicit search path the `PATH` environment variable is used,
/// read at resolve time. References containing a path separator are checked
/// directly and never searched.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    search_path: Option<Vec<PathBuf>>,
}

impl PathResolver {
    /// Resolver over `$PATH`.
    pub fn new() -> Self {
        Self { search_path: None }
    }

    /// Resolver over an explicit list of directories.
    pub fn with_search_path(dirs: Vec<PathBuf>) -> Self {
        Self {
            search_path: Some(dirs),
        }
    }

    fn dirs(&self) -> Vec<PathBuf> {
        match &self.search_path {
            Some(dirs) => dirs.clone(),
            None => env::var_os("PATH")
                .map(|p| env::split_paths(&p).collect())
                .unwrap_or_default(),
        }
    }
}

impl ImageResolver for PathResolver {
    fn resolve(&self, image: &str) -> Result<PathBuf> {
        if image.is_empty() {
            bail!("empty image reference");
        }

        if image.contains(std::path::MAIN_SEPARATOR) || image.contains('/') {
            let candidate = PathBuf::from(image);
            if is_executable(&candidate) {
                return Ok(candidate);
            }
            bail!("image '{image}' is not an executable file");
        }

        for dir in self.dirs() {
            // An empty PATH entry means the current directory.
            let dir = if dir.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                dir
            };
            let candidate = dir.join(image);
            if is_executable(&candidate) {
                debug!(image, path = %candidate.display(), "resolved image");
                return Ok(candidate);
            }
        }

        Err(anyhow!("executable for image '{image}' not found in search path"))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    match path.metadata() {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
