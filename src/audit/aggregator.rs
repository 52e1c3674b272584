use std::collections::BTreeSet;

use serde::Serialize;

use super::classifier::ClassificationResult;
use crate::models::{Dependency, Status};

/// License text recorded for dependencies that matched no allow-list entry.
pub const NO_LICENSE_INFORMATION: &str = "no license information";

/// Separator between fields of one finding line.
const FIELD_SEPARATOR: char = '~';
/// Terminator after every line in the serialized measure form.
const ENTRY_SEPARATOR: char = ';';

/// Sorted, deduplicated audit findings.
///
/// - `dependencies`: `key~licenseTitle~STATUS`
/// - `licenses`: `title~url`, only for dependencies that matched an entry
///
/// Values are combined with [`Findings::with`] and [`Findings::merge`], which
/// are plain set unions: merging is associative and commutative, so results
/// from sub-modules can be folded in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Findings {
    pub dependencies: BTreeSet<String>,
    pub licenses: BTreeSet<String>,
}

impl Findings {
    /// Record one classified dependency.
    pub fn with(mut self, dep: &Dependency, result: &ClassificationResult<'_>) -> Self {
        let license_title = match (result.status, result.license) {
            (Status::Unlisted, _) | (_, None) => NO_LICENSE_INFORMATION,
            (_, Some(license)) => license.title.as_str(),
        };
        self.dependencies.insert(format!(
            "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}",
            dep.key, license_title, result.status
        ));

        if let (Status::Ok | Status::WrongVersion, Some(license)) = (result.status, result.license)
        {
            self.licenses
                .insert(format!("{}{FIELD_SEPARATOR}{}", license.title, license.url));
        }
        self
    }

    /// Union with another set of findings.
    pub fn merge(mut self, other: Findings) -> Self {
        self.dependencies.extend(other.dependencies);
        self.licenses.extend(other.licenses);
        self
    }

    /// Fold classified dependencies into a fresh set of findings.
    pub fn aggregate<'a, 'p, I>(results: I) -> Self
    where
        I: IntoIterator<Item = (&'a Dependency, ClassificationResult<'p>)>,
    {
        results
            .into_iter()
            .fold(Findings::default(), |acc, (dep, result)| acc.with(dep, &result))
    }

    /// Serialize both sets as `entry;entry;` strings (dependencies, licenses).
    pub fn to_measures(&self) -> (String, String) {
        (join(&self.dependencies), join(&self.licenses))
    }

    /// Parse the output of [`Findings::to_measures`], e.g. from a child module.
    pub fn from_measures(dependencies: &str, licenses: &str) -> Self {
        Self {
            dependencies: split(dependencies),
            licenses: split(licenses),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.licenses.is_empty()
    }
}

fn join(set: &BTreeSet<String>) -> String {
    set.iter().map(|s| format!("{s}{ENTRY_SEPARATOR}")).collect()
}

fn split(measure: &str) -> BTreeSet<String> {
    measure
        .split(ENTRY_SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::classifier::classify;
    use crate::config::{AllowEntryConfig, Config};
    use crate::models::Scope;
    use crate::policy::PolicyIndex;
    use proptest::prelude::*;

    fn policy() -> PolicyIndex {
        let mut config = Config::default();
        config.allow.global = vec![
            AllowEntryConfig::new("org.slf4j", "[1.7.0,2.0.0)", Some("MIT")),
            AllowEntryConfig::new("junit:junit", "[4.12,)", Some("EPL")),
            AllowEntryConfig::new("com.acme", "", Some("ACME-EULA")),
        ];
        PolicyIndex::build(&config)
    }

    fn findings_for(policy: &PolicyIndex, deps: &[Dependency]) -> Findings {
        Findings::aggregate(deps.iter().map(|d| (d, classify(d, policy))))
    }

    #[test]
    fn test_line_formats() {
        let policy = policy();
        let deps = vec![
            Dependency::new("org.slf4j:slf4j-api", "1.7.25", Scope::Compile),
            Dependency::new("org.slf4j:slf4j-simple", "2.0.1", Scope::Runtime),
            Dependency::new("com.example:unknown-lib", "1.0", Scope::Compile),
        ];
        let findings = findings_for(&policy, &deps);

        let lines: Vec<&str> = findings.dependencies.iter().map(String::as_str).collect();
        assert_eq!(
            lines,
            vec![
                "com.example:unknown-lib~no license information~UNLISTED",
                "org.slf4j:slf4j-api~MIT~OK",
                "org.slf4j:slf4j-simple~MIT~WRONG_VERSION",
            ]
        );
        let licenses: Vec<&str> = findings.licenses.iter().map(String::as_str).collect();
        assert_eq!(licenses, vec!["MIT~https://opensource.org/licenses/MIT"]);
    }

    #[test]
    fn test_unknown_license_is_reported_as_sentinel() {
        let policy = policy();
        let deps = vec![Dependency::new("com.acme:widgets", "3.0", Scope::Compile)];
        let findings = findings_for(&policy, &deps);
        assert!(findings.dependencies.contains("com.acme:widgets~No License found~OK"));
        assert!(findings.licenses.contains("No License found~"));
    }

    #[test]
    fn test_identical_lines_collapse() {
        let policy = policy();
        let deps = vec![
            Dependency::new("org.slf4j:slf4j-api", "1.7.25", Scope::Compile),
            Dependency::new("org.slf4j:slf4j-api", "1.7.30", Scope::Test),
        ];
        let findings = findings_for(&policy, &deps);
        assert_eq!(findings.dependencies.len(), 1);
        assert_eq!(findings.licenses.len(), 1);
    }

    #[test]
    fn test_disagreeing_scopes_keep_both_lines() {
        let policy = policy();
        let deps = vec![
            Dependency::new("org.slf4j:slf4j-api", "1.7.25", Scope::Compile),
            Dependency::new("org.slf4j:slf4j-api", "2.0.1", Scope::Test),
        ];
        let findings = findings_for(&policy, &deps);
        assert!(findings.dependencies.contains("org.slf4j:slf4j-api~MIT~OK"));
        assert!(findings.dependencies.contains("org.slf4j:slf4j-api~MIT~WRONG_VERSION"));
    }

    #[test]
    fn test_measures_round_trip_through_parent() {
        let policy = policy();
        let child = findings_for(
            &policy,
            &[Dependency::new("junit:junit", "4.13.2", Scope::Test)],
        );
        let (deps, licenses) = child.to_measures();
        assert_eq!(deps, "junit:junit~No License found~OK;");

        let parent = findings_for(
            &policy,
            &[Dependency::new("org.slf4j:slf4j-api", "1.7.25", Scope::Compile)],
        )
        .merge(Findings::from_measures(&deps, &licenses));
        assert_eq!(parent.dependencies.len(), 2);
        assert!(parent.dependencies.contains("junit:junit~No License found~OK"));
    }

    #[test]
    fn test_from_measures_ignores_empty_segments() {
        let findings = Findings::from_measures(";;a~b~OK;", "");
        assert_eq!(findings.dependencies.len(), 1);
        assert!(findings.licenses.is_empty());
        assert!(Findings::from_measures("", "").is_empty());
    }

    fn arb_findings() -> impl Strategy<Value = Findings> {
        let line = "[a-z]{1,4}:[a-z]{1,4}~[A-Z]{1,3}~(OK|UNLISTED|WRONG_VERSION)";
        (
            prop::collection::btree_set(line, 0..6),
            prop::collection::btree_set("[A-Z]{1,3}~https://[a-z]{1,5}", 0..4),
        )
            .prop_map(|(dependencies, licenses)| Findings {
                dependencies,
                licenses,
            })
    }

    proptest! {
        #[test]
        fn prop_merge_is_commutative(a in arb_findings(), b in arb_findings()) {
            prop_assert_eq!(a.clone().merge(b.clone()), b.merge(a));
        }

        #[test]
        fn prop_merge_is_associative(a in arb_findings(), b in arb_findings(), c in arb_findings()) {
            let left = a.clone().merge(b.clone()).merge(c.clone());
            let right = a.merge(b.merge(c));
            prop_assert_eq!(left, right);
        }

        #[test]
        fn prop_merge_is_idempotent(a in arb_findings()) {
            prop_assert_eq!(a.clone().merge(a.clone()), a);
        }

        #[test]
        fn prop_aggregate_ignores_input_order(
            picks in prop::collection::vec((0usize..4, 0usize..5), 0..12)
        ) {
            let policy = policy();
            let keys = ["org.slf4j:slf4j-api", "junit:junit", "com.acme:x", "org.other:y"];
            let versions = ["1.7.25", "2.0.1", "4.13.2", "1.0", "4.1.5.RELEASE"];
            let deps: Vec<Dependency> = picks
                .iter()
                .map(|&(k, v)| Dependency::new(keys[k], versions[v], Scope::Compile))
                .collect();
            let mut reversed = deps.clone();
            reversed.reverse();
            prop_assert_eq!(findings_for(&policy, &deps), findings_for(&policy, &reversed));
        }

        #[test]
        fn prop_measures_round_trip(a in arb_findings()) {
            let (deps, licenses) = a.to_measures();
            prop_assert_eq!(Findings::from_measures(&deps, &licenses), a);
        }
    }
}
