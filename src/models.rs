use serde::{Deserialize, Serialize};

/// A resolved dependency edge handed to the audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Dependency key, usually `group:artifact`.
    pub key: String,
    /// Concrete version the build resolved.
    pub version: String,
    #[serde(default)]
    pub scope: Scope,
    /// Key of the module declaring the dependency, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_key: Option<String>,
}

impl Dependency {
    pub fn new(key: impl Into<String>, version: impl Into<String>, scope: Scope) -> Self {
        Self {
            key: key.into(),
            version: version.into(),
            scope,
            from_key: None,
        }
    }
}

/// Build-time usage category of a dependency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Compile,
    Runtime,
    Test,
    Provided,
}

impl Scope {
    /// Parse a Maven scope name. `system` is treated as `provided`, anything
    /// else unknown falls back to `compile` (Maven's own default).
    pub fn from_maven(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "runtime" => Scope::Runtime,
            "test" => Scope::Test,
            "provided" | "system" => Scope::Provided,
            _ => Scope::Compile,
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Compile => write!(f, "compile"),
            Scope::Runtime => write!(f, "runtime"),
            Scope::Test => write!(f, "test"),
            Scope::Provided => write!(f, "provided"),
        }
    }
}

/// Build system whose manifests declare a module's dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildSystem {
    Maven,
    Gradle,
}

impl std::fmt::Display for BuildSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildSystem::Maven => write!(f, "Maven"),
            BuildSystem::Gradle => write!(f, "Gradle"),
        }
    }
}

/// Kind of source code a license permits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Closed,
    OpensourceCopyleft,
    OpensourceNoCopyleft,
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceType::Closed => write!(f, "Closed"),
            SourceType::OpensourceCopyleft => write!(f, "Open Source (copyleft)"),
            SourceType::OpensourceNoCopyleft => write!(f, "Open Source (no copyleft)"),
        }
    }
}

/// A license known to the policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct License {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub source_type: SourceType,
    pub commercial: bool,
}

/// Outcome of auditing one dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Unlisted,
    WrongVersion,
    Ok,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Unlisted => write!(f, "UNLISTED"),
            Status::WrongVersion => write!(f, "WRONG_VERSION"),
            Status::Ok => write!(f, "OK"),
        }
    }
}
