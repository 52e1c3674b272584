use std::path::{Path, PathBuf};

use anyhow::Result;
use regex::Regex;

use crate::models::{Dependency, Scope};

/// Analyzer for Gradle modules.
///
/// Reads resolved versions from `gradle.lockfile` first, then the declared
/// coordinates of `build.gradle` / `build.gradle.kts`. Sub-modules come from
/// `include` statements in `settings.gradle(.kts)`.
pub struct GradleAnalyzer;

impl GradleAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl super::Analyzer for GradleAnalyzer {
    fn analyze(&self, path: &Path) -> Result<Vec<Dependency>> {
        let mut deps = Vec::new();

        let lockfile = path.join("gradle.lockfile");
        if lockfile.exists() {
            deps.extend(parse_gradle_lockfile(&std::fs::read_to_string(&lockfile)?)?);
        }

        for gradle_file in &["build.gradle", "build.gradle.kts"] {
            let gradle = path.join(gradle_file);
            if gradle.exists() {
                deps.extend(parse_build_gradle(&std::fs::read_to_string(&gradle)?)?);
            }
        }

        Ok(deps)
    }

    fn modules(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut modules = Vec::new();
        for settings_file in &["settings.gradle", "settings.gradle.kts"] {
            let settings = path.join(settings_file);
            if settings.exists() {
                for project in parse_settings_includes(&std::fs::read_to_string(&settings)?)? {
                    modules.push(path.join(project));
                }
            }
        }
        Ok(modules)
    }
}

/// Scope implied by a Gradle configuration name.
fn scope_for_configuration(configuration: &str) -> Scope {
    let lower = configuration.to_ascii_lowercase();
    if lower.starts_with("test") {
        Scope::Test
    } else if lower.starts_with("compileonly") || lower == "annotationprocessor" {
        Scope::Provided
    } else if lower.starts_with("runtime") {
        Scope::Runtime
    } else {
        Scope::Compile
    }
}

/// Parse `build.gradle` or `build.gradle.kts` with regex.
fn parse_build_gradle(content: &str) -> Result<Vec<Dependency>> {
    const CONFIGURATIONS: &str = "implementation|api|compile|compileOnly|runtimeOnly|runtime|\
                                  testImplementation|testCompileOnly|testRuntimeOnly|testCompile";
    let mut deps = Vec::new();

    // implementation 'group:artifact:version'
    // implementation("group:artifact:version")
    let re_shorthand = Regex::new(&format!(
        r#"\b({CONFIGURATIONS})\s*\(?\s*['"]([^'":]+):([^'":]+):([^'"]+)['"]"#
    ))?;
    for caps in re_shorthand.captures_iter(content) {
        deps.push(Dependency::new(
            format!("{}:{}", &caps[2], &caps[3]),
            caps[4].trim(),
            scope_for_configuration(&caps[1]),
        ));
    }

    // implementation group: 'com.example', name: 'foo', version: '1.0'
    let re_map = Regex::new(&format!(
        r#"\b({CONFIGURATIONS})\s*\(?\s*group:\s*['"]([^'"]+)['"]\s*,\s*name:\s*['"]([^'"]+)['"]\s*,\s*version:\s*['"]([^'"]+)['"]"#
    ))?;
    for caps in re_map.captures_iter(content) {
        deps.push(Dependency::new(
            format!("{}:{}", &caps[2], &caps[3]),
            caps[4].trim(),
            scope_for_configuration(&caps[1]),
        ));
    }

    Ok(deps)
}

/// Parse `gradle.lockfile`, format: `group:artifact:version=config1,config2`.
///
/// The scope is the broadest one among the listed configurations.
fn parse_gradle_lockfile(content: &str) -> Result<Vec<Dependency>> {
    let re = Regex::new(r"^([^:#\s]+):([^:]+):([^=\s]+)=(.*)$")?;
    let mut deps = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(caps) = re.captures(line) {
            let scopes: Vec<Scope> = caps[4]
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(|c| scope_for_configuration(c.trim_end_matches("Classpath")))
                .collect();
            let scope = [Scope::Compile, Scope::Runtime, Scope::Provided, Scope::Test]
                .into_iter()
                .find(|s| scopes.contains(s))
                .unwrap_or_default();
            deps.push(Dependency::new(
                format!("{}:{}", &caps[1], &caps[2]),
                &caps[3],
                scope,
            ));
        }
    }

    Ok(deps)
}

/// Project directories named by `include` in a settings script.
fn parse_settings_includes(content: &str) -> Result<Vec<PathBuf>> {
    let re_include = Regex::new(r"(?m)^\s*include\b(.*)$")?;
    let re_name = Regex::new(r#"['"]([^'"]+)['"]"#)?;
    let mut projects = Vec::new();

    for include in re_include.captures_iter(content) {
        for name in re_name.captures_iter(&include[1]) {
            let relative: PathBuf = name[1]
                .split(':')
                .filter(|part| !part.is_empty())
                .collect();
            if !relative.as_os_str().is_empty() {
                projects.push(relative);
            }
        }
    }

    Ok(projects)
}
