use std::path::PathBuf;

use clap::Parser;

use crate::models::BuildSystem;

#[derive(Parser, Debug)]
#[command(
    name = "dependency-checkr",
    about = "Audit project dependencies against an allow-list of versions and licenses",
    version
)]
pub struct Cli {
    /// Project path to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Policy config file [default: ./.dependency-checkr/config.toml, fallback ~/.config/dependency-checkr/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Audit a JSON dependency list instead of scanning build files
    #[arg(long, value_name = "FILE")]
    pub deps: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Exclude a build system from scanning (repeatable)
    #[arg(long = "exclude", value_name = "BUILD_SYSTEM")]
    pub exclude: Vec<BuildSystemArg>,

    /// Audit dependencies of every scope, ignoring the configured ones
    #[arg(long)]
    pub all_scopes: bool,

    /// Show all dependencies (not just violations)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn", value_name = "LEVEL")]
    pub log_level: String,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum BuildSystemArg {
    Maven,
    Gradle,
}

impl From<&BuildSystemArg> for BuildSystem {
    fn from(arg: &BuildSystemArg) -> Self {
        match arg {
            BuildSystemArg::Maven => BuildSystem::Maven,
            BuildSystemArg::Gradle => BuildSystem::Gradle,
        }
    }
}
