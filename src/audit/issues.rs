use serde::Serialize;

use super::classifier::ClassificationResult;
use crate::models::{Dependency, Status};

/// Rule violated by a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleKind {
    Unlisted,
    WrongVersion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Blocker,
    Critical,
}

impl RuleKind {
    /// Stable rule key, as used by issue trackers.
    pub fn key(&self) -> &'static str {
        match self {
            RuleKind::Unlisted => "dependencycheck.unlisted",
            RuleKind::WrongVersion => "dependencycheck.wrongversion",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            RuleKind::Unlisted => Severity::Blocker,
            RuleKind::WrongVersion => Severity::Critical,
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleKind::Unlisted => write!(f, "UNLISTED"),
            RuleKind::WrongVersion => write!(f, "WRONG_VERSION"),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Blocker => write!(f, "blocker"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// One policy violation, ready for an issue sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub rule: RuleKind,
    pub severity: Severity,
    pub dependency_key: String,
    pub message: String,
}

/// Build the issue for a classified dependency; `None` when it is compliant.
pub fn issue_for(dep: &Dependency, result: &ClassificationResult<'_>) -> Option<Issue> {
    let (rule, message) = match result.status {
        Status::Ok => return None,
        Status::Unlisted => (
            RuleKind::Unlisted,
            format!("Dependency: {} is not listed!", dep.key),
        ),
        Status::WrongVersion => {
            let range = result.entry.map(|e| e.range.raw()).unwrap_or_default();
            (
                RuleKind::WrongVersion,
                format!(
                    "Dependency: {} with version: {} is out of the accepted version range! \
                     Accepted version Range: {}",
                    dep.key, dep.version, range
                ),
            )
        }
    };

    Some(Issue {
        rule,
        severity: rule.severity(),
        dependency_key: dep.key.clone(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::classifier::classify;
    use crate::config::{AllowEntryConfig, Config};
    use crate::models::Scope;
    use crate::policy::PolicyIndex;

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
    fn test_ok_has_no_issue() {
        let policy = policy();
        let dep = Dependency::new("org.slf4j:slf4j-api", "1.7.25", Scope::Compile);
        assert!(issue_for(&dep, &classify(&dep, &policy)).is_none());
    }

    #[test]
    fn test_wrong_version_message_names_version_and_range() {
        let policy = policy();
        let dep = Dependency::new("org.slf4j:slf4j-api", "2.0.1", Scope::Compile);
        let issue = issue_for(&dep, &classify(&dep, &policy)).unwrap();
        assert_eq!(issue.rule, RuleKind::WrongVersion);
        assert_eq!(issue.severity, Severity::Critical);
        assert_eq!(issue.dependency_key, "org.slf4j:slf4j-api");
        assert!(issue.message.contains("2.0.1"));
        assert!(issue.message.contains("[1.7.0,2.0.0)"));
        assert_eq!(
            issue.message,
            "Dependency: org.slf4j:slf4j-api with version: 2.0.1 is out of the accepted \
             version range! Accepted version Range: [1.7.0,2.0.0)"
        );
    }

    #[test]
    fn test_unlisted_issue() {
        let policy = policy();
        let dep = Dependency::new("com.example:unknown-lib", "1.0", Scope::Compile);
        let issue = issue_for(&dep, &classify(&dep, &policy)).unwrap();
        assert_eq!(issue.rule, RuleKind::Unlisted);
        assert_eq!(issue.rule.key(), "dependencycheck.unlisted");
        assert_eq!(issue.severity, Severity::Blocker);
        assert_eq!(issue.message, "Dependency: com.example:unknown-lib is not listed!");
    }
}
