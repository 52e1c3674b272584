//! The allow-list and license catalogue an audit runs against.
//!
//! A [`PolicyIndex`] is built once from the configuration and never mutated
//! afterwards, so a single instance can be shared by concurrent audits.

use std::collections::HashSet;

use crate::config::{AllowEntryConfig, Config, LicenseConfig};
use crate::license::spdx::{normalize, source_type_for_id};
use crate::models::{License, SourceType};
use crate::version::range::VersionRange;

/// A policy rule binding a dependency key prefix to a version range and a license.
#[derive(Debug, Clone, PartialEq)]
pub struct AllowListEntry {
    pub key_prefix: String,
    pub range: VersionRange,
    pub license_ref: Option<String>,
}

impl AllowListEntry {
    fn from_config(entry: &AllowEntryConfig) -> Self {
        Self {
            key_prefix: entry.key.trim().to_string(),
            range: VersionRange::parse(&entry.version),
            license_ref: entry.license.clone(),
        }
    }
}

#[derive(Debug)]
pub struct PolicyIndex {
    /// Sorted by descending prefix length so the first match is the longest.
    entries: Vec<AllowListEntry>,
    licenses: Vec<License>,
    no_license: License,
}

impl PolicyIndex {
    pub fn build(config: &Config) -> Self {
        Self::from_parts(
            &config.allow.project,
            &config.allow.global,
            &config.licenses,
        )
    }

    /// Merge project and global allow-lists. On a key collision the project
    /// entry is kept. Entries with an empty key are dropped.
    pub fn from_parts(
        project: &[AllowEntryConfig],
        global: &[AllowEntryConfig],
        licenses: &[LicenseConfig],
    ) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        let mut entries = Vec::new();

        for entry in project.iter().chain(global) {
            let entry = AllowListEntry::from_config(entry);
            if entry.key_prefix.is_empty() {
                tracing::debug!("skipping allow-list entry with an empty key");
                continue;
            }
            if !seen.insert(entry.key_prefix.clone()) {
                tracing::debug!(key = %entry.key_prefix, "allow-list entry shadowed by an earlier one");
                continue;
            }
            entries.push(entry);
        }

        // Stable: equal lengths keep project-before-global declaration order.
        entries.sort_by(|a, b| b.key_prefix.len().cmp(&a.key_prefix.len()));

        Self {
            entries,
            licenses: licenses.iter().map(license_from_config).collect(),
            no_license: License {
                id: String::new(),
                title: "No License found".to_string(),
                description: String::new(),
                url: String::new(),
                source_type: SourceType::Closed,
                commercial: false,
            },
        }
    }

    /// Find the allow-list entry whose key is the longest prefix of `dependency_key`.
    pub fn lookup(&self, dependency_key: &str) -> Option<&AllowListEntry> {
        self.entries
            .iter()
            .find(|e| dependency_key.starts_with(&e.key_prefix))
    }

    /// Resolve a license reference: exact id first, then a substring of the
    /// title, then a known alias of the id (e.g. `"Apache License 2.0"`).
    ///
    /// Never fails; an absent or unknown reference yields [`Self::no_license`].
    pub fn resolve_license(&self, license_ref: Option<&str>) -> &License {
        let Some(reference) = license_ref.map(str::trim).filter(|r| !r.is_empty()) else {
            return &self.no_license;
        };

        self.licenses
            .iter()
            .find(|l| l.id == reference)
            .or_else(|| self.licenses.iter().find(|l| l.title.contains(reference)))
            .or_else(|| {
                let alias = normalize(reference)?;
                self.licenses.iter().find(|l| l.id == alias)
            })
            .unwrap_or(&self.no_license)
    }

    /// Sentinel returned when a license reference resolves to nothing.
    pub fn no_license(&self) -> &License {
        &self.no_license
    }

    pub fn entries(&self) -> &[AllowListEntry] {
        &self.entries
    }

    pub fn licenses(&self) -> &[License] {
        &self.licenses
    }
}

fn license_from_config(cfg: &LicenseConfig) -> License {
    let title = if cfg.title.trim().is_empty() {
        cfg.id.clone()
    } else {
        cfg.title.clone()
    };
    License {
        id: cfg.id.clone(),
        title,
        description: cfg.description.clone(),
        url: cfg.url.clone(),
        source_type: cfg
            .source_type
            .or_else(|| source_type_for_id(&cfg.id))
            .unwrap_or(SourceType::OpensourceCopyleft),
        commercial: cfg.commercial,
    }
}
