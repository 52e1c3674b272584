//! Compliance audit of one module's dependencies.
//!
//! - [`classifier`]: classifies one dependency as `UNLISTED`, `WRONG_VERSION` or `OK`.
//! - [`aggregator`]: folds classifications into sorted finding sets.
//! - [`issues`]: turns violations into issue payloads.

pub mod aggregator;
pub mod classifier;
pub mod issues;

use std::collections::HashSet;

use serde::Serialize;

use crate::config::AllowedScopes;
use crate::models::{Dependency, License, Status};
use crate::policy::PolicyIndex;
use aggregator::Findings;
use classifier::classify;
use issues::{issue_for, Issue};

/// A dependency together with its audit outcome.
#[derive(Debug, Clone, Serialize)]
pub struct CheckedDependency {
    #[serde(flatten)]
    pub dependency: Dependency,
    pub status: Status,
    pub license: Option<License>,
    /// Accepted range of the matching allow-list entry.
    pub accepted_range: Option<String>,
}

/// Audit result of one module, including everything merged from its sub-modules.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleAudit {
    pub name: String,
    /// Own findings plus the findings of every sub-module.
    pub findings: Findings,
    /// Issues raised by this module's own dependencies.
    pub issues: Vec<Issue>,
    /// This module's own audited dependencies, in input order.
    pub dependencies: Vec<CheckedDependency>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ModuleAudit>,
}

impl ModuleAudit {
    /// Attach sub-module audits and merge their published measures into this one.
    pub fn with_children(mut self, children: Vec<ModuleAudit>) -> Self {
        self.findings = children.iter().fold(self.findings, |acc, child| {
            let (dependencies, licenses) = child.findings.to_measures();
            acc.merge(Findings::from_measures(&dependencies, &licenses))
        });
        self.children.extend(children);
        self
    }

    /// Every module in the tree, parents before children.
    pub fn modules(&self) -> Vec<&ModuleAudit> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.modules());
        }
        out
    }

    /// Issues of this module and all sub-modules.
    pub fn all_issues(&self) -> impl Iterator<Item = &Issue> {
        self.modules().into_iter().flat_map(|m| m.issues.iter())
    }

    pub fn count(&self, status: Status) -> usize {
        self.modules()
            .iter()
            .flat_map(|m| m.dependencies.iter())
            .filter(|d| d.status == status)
            .count()
    }
}

/// Audit one module's dependency list.
///
/// Dependencies outside `scopes` are skipped, and each dependency key is
/// classified once per module (the first occurrence wins).
pub fn audit_module(
    name: &str,
    deps: &[Dependency],
    policy: &PolicyIndex,
    scopes: &AllowedScopes,
) -> ModuleAudit {
    let mut handled: HashSet<&str> = HashSet::new();
    let mut classified = Vec::new();
    let mut issues = Vec::new();
    let mut dependencies = Vec::new();

    for dep in deps {
        if !scopes.allows(dep.scope) {
            tracing::debug!(key = %dep.key, scope = %dep.scope, "scope not audited");
            continue;
        }
        if !handled.insert(dep.key.as_str()) {
            continue;
        }

        let result = classify(dep, policy);
        tracing::debug!(
            module = name,
            key = %dep.key,
            version = %dep.version,
            status = %result.status,
            "classified dependency"
        );

        issues.extend(issue_for(dep, &result));
        dependencies.push(CheckedDependency {
            dependency: dep.clone(),
            status: result.status,
            license: result.license.cloned(),
            accepted_range: result.entry.map(|e| e.range.raw().to_string()),
        });
        classified.push((dep, result));
    }

    ModuleAudit {
        name: name.to_string(),
        findings: Findings::aggregate(classified),
        issues,
        dependencies,
        children: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AllowEntryConfig, Config};
    use crate::models::Scope;
    use issues::RuleKind;

    fn policy() -> PolicyIndex {
        let mut config = Config::default();
        config.allow.global = vec![
            AllowEntryConfig::new("org.slf4j", "[1.7.0,2.0.0)", Some("MIT")),
            AllowEntryConfig::new("junit:junit", "[4.12,)", Some("EPL-2.0")),
        ];
        PolicyIndex::build(&config)
    }

    #[test]
    fn test_end_to_end_ok() {
        let policy = policy();
        let deps = vec![Dependency::new("org.slf4j:slf4j-api", "1.7.25", Scope::Compile)];
        let audit = audit_module("app", &deps, &policy, &AllowedScopes::default());
        assert!(audit.issues.is_empty());
        assert_eq!(audit.dependencies[0].status, Status::Ok);
        assert_eq!(audit.dependencies[0].license.as_ref().unwrap().title, "MIT");
    }

    #[test]
    fn test_end_to_end_wrong_version() {
        let policy = policy();
        let deps = vec![Dependency::new("org.slf4j:slf4j-api", "2.0.1", Scope::Compile)];
        let audit = audit_module("app", &deps, &policy, &AllowedScopes::default());
        assert_eq!(audit.issues.len(), 1);
        assert_eq!(audit.issues[0].rule, RuleKind::WrongVersion);
        assert!(audit.issues[0].message.contains("2.0.1"));
        assert!(audit.issues[0].message.contains("[1.7.0,2.0.0)"));
        assert_eq!(
            audit.dependencies[0].accepted_range.as_deref(),
            Some("[1.7.0,2.0.0)")
        );
    }

    #[test]
    fn test_end_to_end_unlisted() {
        let policy = policy();
        let deps = vec![Dependency::new("com.example:unknown-lib", "1.0", Scope::Compile)];
        let audit = audit_module("app", &deps, &policy, &AllowedScopes::default());
        assert_eq!(audit.issues[0].rule, RuleKind::Unlisted);
        assert!(audit.dependencies[0].license.is_none());
        assert!(audit.findings.licenses.is_empty());
    }

    #[test]
    fn test_scope_filter() {
        let policy = policy();
        let deps = vec![
            Dependency::new("junit:junit", "3.8", Scope::Test),
            Dependency::new("javax.servlet:servlet-api", "2.5", Scope::Provided),
        ];
        let audit = audit_module("app", &deps, &policy, &AllowedScopes::default());
        assert!(audit.dependencies.is_empty());
        assert!(audit.findings.is_empty());

        let audit = audit_module("app", &deps, &policy, &AllowedScopes::all());
        assert_eq!(audit.issues.len(), 2);
    }

    #[test]
    fn test_each_key_is_classified_once_per_module() {
        let policy = policy();
        let deps = vec![
            Dependency::new("org.slf4j:slf4j-api", "1.7.25", Scope::Compile),
            Dependency::new("org.slf4j:slf4j-api", "2.0.1", Scope::Runtime),
        ];
        let audit = audit_module("app", &deps, &policy, &AllowedScopes::default());
        assert_eq!(audit.dependencies.len(), 1);
        assert!(audit.issues.is_empty());
    }

    #[test]
    fn test_children_merge_into_parent() {
        let policy = policy();
        let scopes = AllowedScopes::all();
        let core = audit_module(
            "core",
            &[Dependency::new("org.slf4j:slf4j-api", "1.7.25", Scope::Compile)],
            &policy,
            &scopes,
        );
        let web = audit_module(
            "web",
            &[Dependency::new("org.slf4j:slf4j-api", "2.0.1", Scope::Test)],
            &policy,
            &scopes,
        );
        let root = audit_module(
            "root",
            &[Dependency::new("junit:junit", "4.13.2", Scope::Test)],
            &policy,
            &scopes,
        );

        let forward = root.clone().with_children(vec![core.clone(), web.clone()]);
        let backward = root.with_children(vec![web, core]);
        assert_eq!(forward.findings, backward.findings);
        assert_eq!(forward.findings.dependencies.len(), 3);
        assert_eq!(forward.modules().len(), 3);
        assert_eq!(forward.all_issues().count(), 1);
        assert_eq!(forward.count(Status::Ok), 2);
        assert_eq!(forward.count(Status::WrongVersion), 1);
    }

    #[test]
    fn test_shared_policy_across_threads() {
        let policy = policy();
        let scopes = AllowedScopes::default();
        let modules = vec![
            vec![Dependency::new("org.slf4j:slf4j-api", "1.7.25", Scope::Compile)],
            vec![Dependency::new("com.example:unknown-lib", "1.0", Scope::Compile)],
        ];
        let audits: Vec<ModuleAudit> = std::thread::scope(|s| {
            let handles: Vec<_> = modules
                .iter()
                .enumerate()
                .map(|(i, deps)| {
                    let policy = &policy;
                    let scopes = &scopes;
                    s.spawn(move || audit_module(&format!("m{i}"), deps, policy, scopes))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(audits[0].issues.len(), 0);
        assert_eq!(audits[1].issues.len(), 1);
    }
}
