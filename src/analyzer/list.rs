use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Dependency;

/// Read a flat dependency list produced by an external resolver.
///
/// The file is a JSON array of objects with `key`, `version` and optionally
/// `scope` (default `compile`) and `from_key`.
pub fn read_dependency_list(path: &Path) -> Result<Vec<Dependency>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read dependency list {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid dependency list {}", path.display()))
}
