//! Report renderers for audit results.
//!
//! - [`terminal`]: colored, tabular output with summary box; respects `--verbose` / `--quiet`.
//! - [`json`]: machine-readable findings, issues and the module tree.

pub mod json;
pub mod terminal;
