use std::collections::BTreeSet;

use anyhow::Result;
use serde::Serialize;

use crate::audit::issues::Issue;
use crate::audit::ModuleAudit;
use crate::policy::PolicyIndex;
use crate::version::range::RangeAnomaly;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    tool: &'static str,
    version: &'static str,
    dependencies: &'a BTreeSet<String>,
    licenses: &'a BTreeSet<String>,
    measures: Measures,
    issues: Vec<&'a Issue>,
    policy_anomalies: Vec<PolicyAnomaly<'a>>,
    modules: &'a ModuleAudit,
}

/// Findings joined into the `;`-terminated text form.
#[derive(Debug, Serialize)]
struct Measures {
    dependencies: String,
    licenses: String,
}

#[derive(Debug, Serialize)]
struct PolicyAnomaly<'a> {
    key: &'a str,
    range: &'a str,
    problem: String,
    #[serde(rename = "kind")]
    anomaly: &'a RangeAnomaly,
}

/// Render the audit as pretty-printed JSON.
pub fn render(audit: &ModuleAudit, policy: &PolicyIndex) -> Result<String> {
    let policy_anomalies = policy
        .entries()
        .iter()
        .flat_map(|entry| {
            entry.range.anomalies().iter().map(move |anomaly| PolicyAnomaly {
                key: &entry.key_prefix,
                range: entry.range.raw(),
                problem: anomaly.to_string(),
                anomaly,
            })
        })
        .collect();

    let (dependencies, licenses) = audit.findings.to_measures();
    let report = JsonReport {
        tool: "dependency-checkr",
        version: env!("CARGO_PKG_VERSION"),
        dependencies: &audit.findings.dependencies,
        licenses: &audit.findings.licenses,
        measures: Measures {
            dependencies,
            licenses,
        },
        issues: audit.all_issues().collect(),
        policy_anomalies,
        modules: audit,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
