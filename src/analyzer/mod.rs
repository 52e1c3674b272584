use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::models::Dependency;

pub mod gradle;
pub mod list;
pub mod maven;

/// Collects the declared dependencies of one module.
pub trait Analyzer {
    fn analyze(&self, path: &Path) -> Result<Vec<Dependency>>;

    /// Directories of the module's sub-modules.
    fn modules(&self, _path: &Path) -> Result<Vec<PathBuf>> {
        Ok(Vec::new())
    }

    /// Dependency key the module itself is published under, if known.
    fn project_key(&self, _path: &Path) -> Result<Option<String>> {
        Ok(None)
    }
}
