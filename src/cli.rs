//! CLI argument parsing module for poetryup

use crate::domain::ConstraintKind;
use crate::error::ConfigError;
use crate::update::UpdateFilter;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Parse a constraint kind name (e.g. `exact`, `multiple-requirements`)
fn parse_constraint_kind(s: &str) -> Result<ConstraintKind, ConfigError> {
    s.parse().map_err(|_| ConfigError::InvalidConstraintKind {
        value: s.to_string(),
    })
}

/// Update Poetry dependencies and bump their version in pyproject.toml
#[derive(Parser, Debug, Clone)]
#[command(
    name = "poetryup",
    version,
    about = "Update dependencies and bump their version in the pyproject.toml file"
)]
pub struct CliArgs {
    /// Project directory or pyproject.toml path (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Update dependencies to their latest version instead of within constraints
    #[arg(long)]
    pub latest: bool,

    // Dependency filters
    /// Skip dependencies with an exact version
    #[arg(long)]
    pub skip_exact: bool,

    /// Skip dependencies with this constraint kind (can be specified multiple times)
    #[arg(long, value_name = "KIND", action = ArgAction::Append, value_parser = parse_constraint_kind)]
    pub without_constraint: Vec<ConstraintKind>,

    /// The dependency names to include (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub name: Vec<String>,

    /// The dependency names to exclude (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub exclude_name: Vec<String>,

    /// The dependency groups to include (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub group: Vec<String>,

    // General options
    /// Dry run mode - show what would be bumped without running poetry update or writing files
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Don't refresh poetry.lock after writing pyproject.toml
    #[arg(long)]
    pub no_lock: bool,

    /// Poetry executable to run
    #[arg(long, value_name = "PATH", env = "POETRYUP_POETRY", default_value = "poetry")]
    pub poetry: PathBuf,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Show changes in diff format
    #[arg(long)]
    pub diff: bool,

    /// Increase verbosity: "-v" for info, "-vv" for debug
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Reject option combinations that cannot be honored
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.json && self.diff {
            return Err(ConfigError::ConflictingOptions {
                message: "--json and --diff cannot be used together".to_string(),
            });
        }
        if self.quiet && self.verbose > 0 {
            return Err(ConfigError::ConflictingOptions {
                message: "--quiet and --verbose cannot be used together".to_string(),
            });
        }
        Ok(())
    }

    /// Constraint kinds to leave alone, including `--skip-exact`
    pub fn without_constraints(&self) -> Vec<ConstraintKind> {
        let mut kinds = self.without_constraint.clone();
        if self.skip_exact && !kinds.contains(&ConstraintKind::Exact) {
            kinds.push(ConstraintKind::Exact);
        }
        kinds
    }

    /// Build an UpdateFilter from the filter options
    pub fn build_filter(&self) -> UpdateFilter {
        UpdateFilter::new()
            .with_names(self.name.clone())
            .with_exclude_names(self.exclude_name.clone())
            .with_groups(self.group.clone())
            .with_without_constraints(self.without_constraints())
    }

    /// Default log level directive derived from `-v` and `-q`
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
