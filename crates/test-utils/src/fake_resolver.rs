use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use unilet::exec::ImageResolver;

/// Resolver backed by a fixed image -> path table.
///
/// Unknown images fail to resolve, so an empty table behaves like a node
/// without any executables installed.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    paths: HashMap<String, PathBuf>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, image: &str, path: &str) -> Self {
        self.paths.insert(image.to_string(), PathBuf::from(path));
        self
    }
}

impl ImageResolver for StaticResolver {
    fn resolve(&self, image: &str) -> Result<PathBuf> {
        self.paths
            .get(image)
            .cloned()
            .ok_or_else(|| anyhow!("image '{image}' not found"))
    }
}
