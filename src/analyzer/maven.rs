use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::models::{Dependency, Scope};

/// Analyzer for Maven modules.
///
/// Reads the declared `<dependencies>` of `pom.xml` together with their
/// `<scope>`. Versions left out are taken from `<dependencyManagement>` in the
/// same file, and `${property}` references are expanded from `<properties>`.
pub struct MavenAnalyzer;

impl MavenAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl super::Analyzer for MavenAnalyzer {
    fn analyze(&self, path: &Path) -> Result<Vec<Dependency>> {
        let pom_path = path.join("pom.xml");
        if !pom_path.exists() {
            return Ok(Vec::new());
        }
        let pom = parse_pom(&std::fs::read_to_string(&pom_path)?);
        Ok(pom.dependencies())
    }

    fn modules(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let pom_path = path.join("pom.xml");
        if !pom_path.exists() {
            return Ok(Vec::new());
        }
        let pom = parse_pom(&std::fs::read_to_string(&pom_path)?);
        Ok(pom.modules.iter().map(|m| path.join(m.trim())).collect())
    }

    fn project_key(&self, path: &Path) -> Result<Option<String>> {
        let pom_path = path.join("pom.xml");
        if !pom_path.exists() {
            return Ok(None);
        }
        let pom = parse_pom(&std::fs::read_to_string(&pom_path)?);
        Ok((!pom.artifact_id.is_empty()).then(|| pom.key()))
    }
}

#[derive(Debug, Default, Clone)]
struct PomDependency {
    group_id: String,
    artifact_id: String,
    version: String,
    scope: String,
}

impl PomDependency {
    fn key(&self) -> String {
        if self.group_id.is_empty() {
            self.artifact_id.clone()
        } else {
            format!("{}:{}", self.group_id, self.artifact_id)
        }
    }
}

#[derive(Debug, Default)]
struct Pom {
    group_id: String,
    artifact_id: String,
    version: String,
    parent_group_id: String,
    parent_version: String,
    properties: HashMap<String, String>,
    declared: Vec<PomDependency>,
    managed: Vec<PomDependency>,
    modules: Vec<String>,
}

const DECLARED: &[&str] = &["project", "dependencies", "dependency"];
const MANAGED: &[&str] = &["project", "dependencyManagement", "dependencies", "dependency"];

impl Pom {
    fn key(&self) -> String {
        format!("{}:{}", self.group(), self.artifact_id)
    }

    /// Expand `${name}` references from `<properties>` and the project coordinates.
    fn interpolate(&self, raw: &str) -> String {
        let mut out = String::new();
        let mut rest = raw;
        while let Some(start) = rest.find("${") {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            let name = &rest[start + 2..start + len];
            out.push_str(&rest[..start]);
            match self.property(name) {
                Some(value) => out.push_str(value),
                None => out.push_str(&rest[start..=start + len]),
            }
            rest = &rest[start + len + 1..];
        }
        out.push_str(rest);
        out
    }

    fn group(&self) -> &str {
        if self.group_id.is_empty() {
            &self.parent_group_id
        } else {
            &self.group_id
        }
    }

    fn property(&self, name: &str) -> Option<&str> {
        let version = if self.version.is_empty() {
            &self.parent_version
        } else {
            &self.version
        };
        match name {
            "project.version" | "version" | "pom.version" => Some(version.as_str()),
            "project.groupId" | "groupId" => Some(self.group()),
            "project.artifactId" | "artifactId" => Some(self.artifact_id.as_str()),
            _ => self.properties.get(name).map(String::as_str),
        }
    }

    fn dependencies(&self) -> Vec<Dependency> {
        let module_key = self.key();
        self.declared
            .iter()
            .filter(|d| !d.artifact_id.is_empty())
            .map(|d| {
                let key = self.interpolate(&d.key());
                let managed = self.managed.iter().find(|m| self.interpolate(&m.key()) == key);

                let mut version = self.interpolate(&d.version);
                if version.is_empty() {
                    version = managed
                        .map(|m| self.interpolate(&m.version))
                        .unwrap_or_default();
                }
                if version.is_empty() {
                    tracing::debug!(key = %key, "no version declared or managed");
                }

                let scope = if d.scope.is_empty() {
                    managed.map(|m| m.scope.as_str()).unwrap_or_default()
                } else {
                    d.scope.as_str()
                };

                Dependency {
                    key,
                    version,
                    scope: Scope::from_maven(scope),
                    from_key: Some(module_key.clone()),
                }
            })
            .collect()
    }
}

/// Parse `pom.xml` using the quick-xml event API, tracking the element path.
fn parse_pom(content: &str) -> Pom {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut pom = Pom::default();
    let mut buf = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut current: Option<PomDependency> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                stack.push(String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned());
                if path_is(&stack, DECLARED) || path_is(&stack, MANAGED) {
                    current = Some(PomDependency::default());
                }
            }
            Ok(Event::End(_)) => {
                if path_is(&stack, DECLARED) {
                    pom.declared.extend(current.take());
                } else if path_is(&stack, MANAGED) {
                    pom.managed.extend(current.take());
                }
                stack.pop();
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default().to_string();
                let path: Vec<&str> = stack.iter().map(String::as_str).collect();
                match path.as_slice() {
                    ["project", "groupId"] => pom.group_id = text,
                    ["project", "artifactId"] => pom.artifact_id = text,
                    ["project", "version"] => pom.version = text,
                    ["project", "parent", "groupId"] => pom.parent_group_id = text,
                    ["project", "parent", "version"] => pom.parent_version = text,
                    ["project", "properties", name] => {
                        pom.properties.insert(name.to_string(), text);
                    }
                    ["project", "modules", "module"] => pom.modules.push(text),
                    [parent @ .., field] if parent == DECLARED || parent == MANAGED => {
                        if let Some(dep) = current.as_mut() {
                            match *field {
                                "groupId" => dep.group_id = text,
                                "artifactId" => dep.artifact_id = text,
                                "version" => dep.version = text,
                                "scope" => dep.scope = text,
                                _ => {}
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::warn!("stopped reading malformed pom.xml: {e}");
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    pom
}

fn path_is(stack: &[String], expected: &[&str]) -> bool {
    stack.len() == expected.len() && stack.iter().zip(expected).all(|(a, b)| a == b)
}
