use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::audit::issues::RuleKind;
use crate::audit::ModuleAudit;
use crate::models::{SourceType, Status};
use crate::policy::PolicyIndex;

/// Render a colored terminal report.
pub fn render(
    audit: &ModuleAudit,
    policy: &PolicyIndex,
    path: &Path,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    let ok_count = audit.count(Status::Ok);
    let wrong_count = audit.count(Status::WrongVersion);
    let unlisted_count = audit.count(Status::Unlisted);
    let total = ok_count + wrong_count + unlisted_count;

    if quiet {
        println!(
            "Total: {}  OK: {}  Wrong version: {}  Unlisted: {}",
            total,
            ok_count.to_string().green(),
            wrong_count.to_string().yellow(),
            unlisted_count.to_string().red(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "dependency-checkr".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Auditing: {}\n", path.display());

    render_policy_anomalies(policy);

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(
        " │  {:<48} │",
        format!("Modules audited    : {}", audit.modules().len())
    );
    println!(" │  {:<48} │", format!("Dependencies       : {}", total));
    println!(
        " │  {:<48} │",
        format!("{}  OK            : {:>4}", "✓".green(), ok_count)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Wrong version : {:>4}", "⚠".yellow(), wrong_count)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Unlisted      : {:>4}", "✗".red(), unlisted_count)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if audit.findings.is_empty() {
        println!(" No dependencies in audited scopes.\n");
        return Ok(());
    }

    let issue_count = audit.all_issues().count();
    if issue_count > 0 {
        println!(" {} Policy violations:\n", "[ISSUES]".red().bold());
        render_issues(audit);
        println!();
    }

    if !audit.findings.licenses.is_empty() {
        println!(" {} Licenses in use:\n", "[LICENSES]".cyan().bold());
        render_licenses(audit, policy);
        println!();
    }

    if verbose && total > 0 {
        println!(" {} All audited dependencies:\n", "[ALL]".green().bold());
        render_dependencies(audit);
        println!();
    }

    Ok(())
}

fn render_policy_anomalies(policy: &PolicyIndex) {
    let mut any = false;
    for entry in policy.entries() {
        for anomaly in entry.range.anomalies() {
            println!(
                " {} {}: {} (accepting any version)",
                "[POLICY]".yellow().bold(),
                entry.key_prefix,
                anomaly
            );
            any = true;
        }
    }
    if any {
        println!();
    }
}

fn render_issues(audit: &ModuleAudit) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Module").add_attribute(Attribute::Bold),
            Cell::new("Rule").add_attribute(Attribute::Bold),
            Cell::new("Severity").add_attribute(Attribute::Bold),
            Cell::new("Message").add_attribute(Attribute::Bold),
        ]);

    for module in audit.modules() {
        for issue in &module.issues {
            let color = match issue.rule {
                RuleKind::Unlisted => Color::Red,
                RuleKind::WrongVersion => Color::Yellow,
            };
            table.add_row(vec![
                Cell::new(&module.name),
                Cell::new(issue.rule.key()).fg(color),
                Cell::new(issue.severity.to_string()).set_alignment(CellAlignment::Center),
                Cell::new(&issue.message),
            ]);
        }
    }

    println!("{}", table);
}

fn render_licenses(audit: &ModuleAudit, policy: &PolicyIndex) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("URL").add_attribute(Attribute::Bold),
            Cell::new("Source type").add_attribute(Attribute::Bold),
            Cell::new("Commercial").add_attribute(Attribute::Bold),
        ]);

    for line in &audit.findings.licenses {
        let (title, url) = line.split_once('~').unwrap_or((line.as_str(), ""));
        let license = policy
            .licenses()
            .iter()
            .find(|l| l.title == title)
            .unwrap_or(policy.no_license());

        table.add_row(vec![
            Cell::new(title),
            Cell::new(url),
            Cell::new(license.source_type.to_string()).fg(source_type_color(license.source_type)),
            Cell::new(if license.commercial { "yes" } else { "no" })
                .set_alignment(CellAlignment::Center),
        ]);
    }

    println!("{}", table);
}

fn render_dependencies(audit: &ModuleAudit) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Module").add_attribute(Attribute::Bold),
            Cell::new("Dependency").add_attribute(Attribute::Bold),
            Cell::new("Version").add_attribute(Attribute::Bold),
            Cell::new("Scope").add_attribute(Attribute::Bold),
            Cell::new("Accepted").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for module in audit.modules() {
        for checked in &module.dependencies {
            let (status_str, status_color) = match checked.status {
                Status::Ok => ("✓ OK", Color::Green),
                Status::WrongVersion => ("⚠ WRONG_VERSION", Color::Yellow),
                Status::Unlisted => ("✗ UNLISTED", Color::Red),
            };
            let license = checked
                .license
                .as_ref()
                .map(|l| l.title.as_str())
                .unwrap_or("-");

            table.add_row(vec![
                Cell::new(&module.name),
                Cell::new(&checked.dependency.key),
                Cell::new(&checked.dependency.version),
                Cell::new(checked.dependency.scope.to_string()),
                Cell::new(checked.accepted_range.as_deref().unwrap_or("-")),
                Cell::new(license),
                Cell::new(status_str)
                    .fg(status_color)
                    .set_alignment(CellAlignment::Center),
            ]);
        }
    }

    println!("{}", table);
}

fn source_type_color(source_type: SourceType) -> Color {
    match source_type {
        SourceType::OpensourceNoCopyleft => Color::Green,
        SourceType::OpensourceCopyleft => Color::Yellow,
        SourceType::Closed => Color::Magenta,
    }
}
