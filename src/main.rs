//! `dependency-checkr` - audit declared dependencies against an allow-list of
//! versions and licenses.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and set up `tracing`.
//! 2. Load policy config ([`config::load_config`]) and index it ([`policy::PolicyIndex`]).
//! 3. Collect dependencies: a JSON list (`--deps`, [`analyzer::list`]) or the
//!    build files of the project and its sub-modules ([`scan::Scanner`]).
//! 4. Classify each dependency and aggregate findings ([`audit`]).
//! 5. Render the requested report ([`report`]).
//! 6. Exit `0` (clean) or `1` (at least one policy violation).

mod analyzer;
mod audit;
mod cli;
mod config;
mod detector;
mod license;
mod models;
mod policy;
mod report;
mod scan;
mod version;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use analyzer::list::read_dependency_list;
use audit::{audit_module, ModuleAudit};
use cli::{Cli, ReportFormat};
use config::{load_config, AllowedScopes};
use models::BuildSystem;
use policy::PolicyIndex;
use scan::Scanner;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Resolve project path
    let path = cli
        .path
        .canonicalize()
        .unwrap_or_else(|_| cli.path.clone());

    // Load policy config
    let config = load_config(&path, cli.config.as_deref())?;
    let policy = PolicyIndex::build(&config);
    let scopes = if cli.all_scopes {
        AllowedScopes::all()
    } else {
        config.scopes.clone()
    };
    tracing::debug!(entries = policy.entries().len(), licenses = policy.licenses().len(), "policy loaded");

    let audit = match &cli.deps {
        Some(list) => {
            let deps = read_dependency_list(list)?;
            audit_module(&list_name(list), &deps, &policy, &scopes)
        }
        None => {
            let excluded: Vec<BuildSystem> = cli.exclude.iter().map(Into::into).collect();
            let scanner = Scanner::new(&policy, &scopes, excluded);

            let systems = scanner.build_systems(&path);
            if systems.is_empty() {
                eprintln!("No supported build files found in {}", path.display());
                std::process::exit(1);
            }
            if !cli.quiet && matches!(cli.report, ReportFormat::Terminal) {
                for system in &systems {
                    eprintln!("  {} {} project detected", "→".cyan(), system);
                }
            }

            scanner.scan(&path)?
        }
    };

    render(&cli, &audit, &policy, &path)?;

    // Exit code: 1 if any module raised an issue
    if audit.all_issues().next().is_some() {
        std::process::exit(1);
    }

    Ok(())
}

fn render(cli: &Cli, audit: &ModuleAudit, policy: &PolicyIndex, path: &Path) -> Result<()> {
    match cli.report {
        ReportFormat::Terminal => report::terminal::render(audit, policy, path, cli.verbose, cli.quiet),
        ReportFormat::Json => {
            println!("{}", report::json::render(audit, policy)?);
            Ok(())
        }
    }
}

fn list_name(list: &Path) -> String {
    list.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| list.display().to_string())
}
