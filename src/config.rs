use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::license::spdx::source_type_for_id;
use crate::models::{Scope, SourceType};

/// Root configuration structure, deserialized from `.dependency-checkr/config.toml`.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Which dependency scopes are audited.
    #[serde(default)]
    pub scopes: AllowedScopes,
    /// Licenses the allow-list may refer to. Defaults to a built-in list of
    /// common open-source licenses when the table is absent.
    #[serde(default = "builtin_licenses")]
    pub licenses: Vec<LicenseConfig>,
    /// Allowed dependencies.
    #[serde(default)]
    pub allow: AllowConfig,
}

/// Scopes whose dependencies are audited. Compile and runtime are on by default.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AllowedScopes {
    #[serde(default = "enabled")]
    pub compile: bool,
    #[serde(default = "enabled")]
    pub runtime: bool,
    #[serde(default)]
    pub test: bool,
    #[serde(default)]
    pub provided: bool,
}

fn enabled() -> bool {
    true
}

impl AllowedScopes {
    pub fn allows(&self, scope: Scope) -> bool {
        match scope {
            Scope::Compile => self.compile,
            Scope::Runtime => self.runtime,
            Scope::Test => self.test,
            Scope::Provided => self.provided,
        }
    }

    /// Every scope enabled.
    pub fn all() -> Self {
        Self {
            compile: true,
            runtime: true,
            test: true,
            provided: true,
        }
    }
}

impl Default for AllowedScopes {
    fn default() -> Self {
        Self {
            compile: true,
            runtime: true,
            test: false,
            provided: false,
        }
    }
}

/// A license record as written in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct LicenseConfig {
    /// Short identifier, e.g. `"MIT"` or `"LGPL-2.1"`.
    pub id: String,
    /// Full title. Falls back to `id` when empty.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    /// Derived from the SPDX id when omitted; unknown ids count as copyleft.
    #[serde(default)]
    pub source_type: Option<SourceType>,
    #[serde(default)]
    pub commercial: bool,
}

impl LicenseConfig {
    fn builtin(id: &str, title: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            url: url.to_string(),
            source_type: source_type_for_id(id),
            commercial: false,
        }
    }
}

/// Global and project-scoped allow-lists. Project entries win on key collisions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AllowConfig {
    #[serde(default)]
    pub global: Vec<AllowEntryConfig>,
    #[serde(default)]
    pub project: Vec<AllowEntryConfig>,
}

/// One allowed dependency.
#[derive(Debug, Clone, Deserialize)]
pub struct AllowEntryConfig {
    /// Dependency key prefix, e.g. `"org.slf4j"` or `"junit:junit"`.
    pub key: String,
    /// Maven version range. Empty allows every version.
    #[serde(default)]
    pub version: String,
    /// License id or (part of the) title.
    #[serde(default)]
    pub license: Option<String>,
}

#[cfg(test)]
impl AllowEntryConfig {
    pub fn new(key: &str, version: &str, license: Option<&str>) -> Self {
        Self {
            key: key.to_string(),
            version: version.to_string(),
            license: license.map(str::to_string),
        }
    }
}

impl Default for Config {
    /// Built-in configuration used when no config file is found: nothing is
    /// allowed, so every audited dependency is reported as unlisted.
    fn default() -> Self {
        Config {
            scopes: AllowedScopes::default(),
            licenses: builtin_licenses(),
            allow: AllowConfig::default(),
        }
    }
}

fn builtin_licenses() -> Vec<LicenseConfig> {
    vec![
        LicenseConfig::builtin("MIT", "MIT", "https://opensource.org/licenses/MIT"),
        LicenseConfig::builtin(
            "Apache-2.0",
            "Apache License, Version 2.0",
            "https://www.apache.org/licenses/LICENSE-2.0",
        ),
        LicenseConfig::builtin(
            "BSD-3-Clause",
            "BSD 3-Clause License",
            "https://opensource.org/licenses/BSD-3-Clause",
        ),
        LicenseConfig::builtin(
            "EPL-2.0",
            "Eclipse Public License 2.0",
            "https://www.eclipse.org/legal/epl-2.0/",
        ),
        LicenseConfig::builtin(
            "LGPL-2.1",
            "GNU Lesser General Public License v2.1",
            "https://www.gnu.org/licenses/old-licenses/lgpl-2.1.html",
        ),
        LicenseConfig::builtin(
            "GPL-3.0",
            "GNU General Public License v3.0",
            "https://www.gnu.org/licenses/gpl-3.0.html",
        ),
    ]
}

/// Failure to obtain a usable configuration. Fatal for the whole audit.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<project_path>/.dependency-checkr/config.toml`
/// 3. `~/.config/dependency-checkr/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".dependency-checkr").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("dependency-checkr")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    tracing::debug!("no config file found, using built-in defaults");
    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    tracing::debug!(path = %path.display(), "loading config");
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
