use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::analyzer::gradle::GradleAnalyzer;
use crate::analyzer::maven::MavenAnalyzer;
use crate::analyzer::Analyzer;
use crate::audit::{audit_module, ModuleAudit};
use crate::config::AllowedScopes;
use crate::detector::detect_build_systems;
use crate::models::{BuildSystem, Dependency};
use crate::policy::PolicyIndex;

/// Walks a project directory and its sub-modules, auditing each one.
pub struct Scanner<'a> {
    policy: &'a PolicyIndex,
    scopes: &'a AllowedScopes,
    excluded: Vec<BuildSystem>,
}

impl<'a> Scanner<'a> {
    pub fn new(policy: &'a PolicyIndex, scopes: &'a AllowedScopes, excluded: Vec<BuildSystem>) -> Self {
        Self {
            policy,
            scopes,
            excluded,
        }
    }

    /// Build systems found at `path`, minus the excluded ones.
    pub fn build_systems(&self, path: &Path) -> Vec<BuildSystem> {
        detect_build_systems(path)
            .into_iter()
            .filter(|s| !self.excluded.contains(s))
            .collect()
    }

    /// Audit `path` and every sub-module below it. Children are audited first
    /// and their findings merged into the parent.
    ///
    /// Dependencies on modules of the scanned project itself are not
    /// third-party libraries and are left out of the audit.
    pub fn scan(&self, path: &Path) -> Result<ModuleAudit> {
        let mut visited = HashSet::new();
        let mut project_keys = HashSet::new();
        let tree = self.collect(path, &mut visited, &mut project_keys)?;
        Ok(self.audit(tree, &project_keys))
    }

    fn collect(
        &self,
        path: &Path,
        visited: &mut HashSet<PathBuf>,
        project_keys: &mut HashSet<String>,
    ) -> Result<CollectedModule> {
        visited.insert(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()));

        let mut deps: Vec<Dependency> = Vec::new();
        let mut module_dirs: Vec<PathBuf> = Vec::new();
        for system in self.build_systems(path) {
            let analyzer: Box<dyn Analyzer> = match system {
                BuildSystem::Maven => Box::new(MavenAnalyzer::new()),
                BuildSystem::Gradle => Box::new(GradleAnalyzer::new()),
            };
            let found = analyzer.analyze(path)?;
            tracing::debug!(module = %path.display(), %system, count = found.len(), "collected dependencies");
            deps.extend(found);
            module_dirs.extend(analyzer.modules(path)?);
            project_keys.extend(analyzer.project_key(path)?);
        }

        let mut children = Vec::new();
        for dir in module_dirs {
            let canonical = dir.canonicalize().unwrap_or_else(|_| dir.clone());
            if !dir.is_dir() {
                tracing::warn!(module = %dir.display(), "sub-module directory not found, skipping");
                continue;
            }
            if visited.contains(&canonical) {
                continue;
            }
            children.push(self.collect(&dir, visited, project_keys)?);
        }

        Ok(CollectedModule {
            name: module_name(path),
            deps,
            children,
        })
    }

    fn audit(&self, module: CollectedModule, project_keys: &HashSet<String>) -> ModuleAudit {
        let children = module
            .children
            .into_iter()
            .map(|child| self.audit(child, project_keys))
            .collect();

        let deps: Vec<Dependency> = module
            .deps
            .into_iter()
            .filter(|dep| {
                let internal = project_keys.contains(&dep.key);
                if internal {
                    tracing::debug!(module = %module.name, key = %dep.key, "skipping project module");
                }
                !internal
            })
            .collect();

        audit_module(&module.name, &deps, self.policy, self.scopes).with_children(children)
    }
}

/// Dependencies of one module, read before anything is audited so that the
/// keys of all project modules are known up front.
struct CollectedModule {
    name: String,
    deps: Vec<Dependency>,
    children: Vec<CollectedModule>,
}

fn module_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AllowEntryConfig, Config};
    use crate::models::Status;
    use tempfile::TempDir;

    fn pom(artifact: &str, modules: &[&str], deps: &[(&str, &str, &str)]) -> String {
        let modules: String = modules
            .iter()
            .map(|m| format!("<module>{m}</module>"))
            .collect();
        let deps: String = deps
            .iter()
            .map(|(g, a, v)| {
                format!("<dependency><groupId>{g}</groupId><artifactId>{a}</artifactId><version>{v}</version></dependency>")
            })
            .collect();
        format!(
            "<project><groupId>com.acme</groupId><artifactId>{artifact}</artifactId>\
             <modules>{modules}</modules><dependencies>{deps}</dependencies></project>"
        )
    }

    fn policy() -> PolicyIndex {
        let mut config = Config::default();
        config.allow.global = vec![AllowEntryConfig::new(
            "org.slf4j",
            "[1.7.0,2.0.0)",
            Some("MIT"),
        )];
        PolicyIndex::build(&config)
    }

    #[test]
    fn test_scan_multi_module_project() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::write(root.join("pom.xml"), pom("shop", &["core", "web", "missing"], &[])).unwrap();
        std::fs::create_dir(root.join("core")).unwrap();
        std::fs::write(
            root.join("core").join("pom.xml"),
            pom("core", &[], &[("org.slf4j", "slf4j-api", "1.7.25")]),
        )
        .unwrap();
        std::fs::create_dir(root.join("web")).unwrap();
        std::fs::write(
            root.join("web").join("pom.xml"),
            pom("web", &[], &[("org.slf4j", "slf4j-api", "2.0.1"), ("com.example", "unknown-lib", "1.0")]),
        )
        .unwrap();

        let policy = policy();
        let scopes = AllowedScopes::default();
        let audit = Scanner::new(&policy, &scopes, Vec::new()).scan(root).unwrap();

        assert_eq!(audit.children.len(), 2);
        assert!(audit.dependencies.is_empty());
        assert_eq!(
            audit.findings.dependencies.iter().cloned().collect::<Vec<_>>(),
            vec![
                "com.example:unknown-lib~no license information~UNLISTED".to_string(),
                "org.slf4j:slf4j-api~MIT~OK".to_string(),
                "org.slf4j:slf4j-api~MIT~WRONG_VERSION".to_string(),
            ]
        );
        assert_eq!(audit.all_issues().count(), 2);
        assert_eq!(audit.count(Status::Ok), 1);
    }

    #[test]
    fn test_sibling_modules_are_not_audited() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::write(root.join("pom.xml"), pom("shop", &["web", "core"], &[])).unwrap();
        std::fs::create_dir(root.join("web")).unwrap();
        std::fs::write(
            root.join("web").join("pom.xml"),
            r#"<project>
  <parent><groupId>com.acme</groupId><artifactId>shop</artifactId><version>1.0</version></parent>
  <artifactId>web</artifactId>
  <dependencies>
    <dependency><groupId>${project.groupId}</groupId><artifactId>core</artifactId><version>${project.version}</version></dependency>
    <dependency><groupId>org.slf4j</groupId><artifactId>slf4j-api</artifactId><version>1.7.25</version></dependency>
  </dependencies>
</project>"#,
        )
        .unwrap();
        std::fs::create_dir(root.join("core")).unwrap();
        std::fs::write(root.join("core").join("pom.xml"), pom("core", &[], &[])).unwrap();

        let policy = policy();
        let scopes = AllowedScopes::default();
        let audit = Scanner::new(&policy, &scopes, Vec::new()).scan(root).unwrap();

        assert_eq!(audit.all_issues().count(), 0);
        let web = &audit.children[0];
        assert_eq!(web.name, "web");
        assert_eq!(web.dependencies.len(), 1);
        assert_eq!(web.dependencies[0].dependency.key, "org.slf4j:slf4j-api");
        assert_eq!(
            audit.findings.dependencies.iter().cloned().collect::<Vec<_>>(),
            vec!["org.slf4j:slf4j-api~MIT~OK".to_string()]
        );
    }

    #[test]
    fn test_scan_ignores_module_cycles() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::write(root.join("pom.xml"), pom("shop", &["."], &[])).unwrap();
        let policy = policy();
        let scopes = AllowedScopes::default();
        let audit = Scanner::new(&policy, &scopes, Vec::new()).scan(root).unwrap();
        assert!(audit.children.is_empty());
    }

    #[test]
    fn test_excluded_build_system_is_skipped() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("pom.xml"),
            pom("shop", &[], &[("com.example", "unknown-lib", "1.0")]),
        )
        .unwrap();
        let policy = policy();
        let scopes = AllowedScopes::default();
        let scanner = Scanner::new(&policy, &scopes, vec![BuildSystem::Maven]);
        assert!(scanner.build_systems(dir.path()).is_empty());
        assert!(scanner.scan(dir.path()).unwrap().dependencies.is_empty());
    }
}
