//! Reports printed after a run
//!
//! The text report is the default. `--json` and `--diff` replace it.

mod diff;
mod json;
mod text;

pub use diff::DiffFormatter;
pub use json::JsonFormatter;
pub use text::{TextFormatter, VersionChangeType};

use crate::cli::CliArgs;
use crate::domain::{DependencyVersion, ManifestUpdateResult};
use crate::orchestrator::OrchestratorResult;
use std::io::Write;

/// How much the text report shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Summary line only
    Quiet,
    Normal,
    /// Also list skipped dependencies with their reason
    Verbose,
}

impl Verbosity {
    fn from_args(args: &CliArgs) -> Self {
        if args.quiet {
            Verbosity::Quiet
        } else if args.verbose > 0 {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

/// A report over the outcome of one run
pub trait OutputFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()>;

    /// Bump and skip counts only
    fn format_summary(
        &self,
        manifest: &ManifestUpdateResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;
}

/// The report the command line asked for
///
/// `color` only affects the text report.
pub fn formatter_for(args: &CliArgs, color: bool) -> Box<dyn OutputFormatter> {
    if args.json {
        Box::new(JsonFormatter::new())
    } else if args.diff {
        Box::new(DiffFormatter::new(args.dry_run))
    } else {
        Box::new(TextFormatter::new(
            Verbosity::from_args(args),
            args.dry_run,
            color,
        ))
    }
}

/// Short form of a version value: the expression, or the whole value
pub(crate) fn short_version(version: &DependencyVersion) -> String {
    match version.expression() {
        Some(expression) => expression.to_string(),
        None => version.to_string(),
    }
}

/// TOML form of a version value as it appears in the manifest
pub(crate) fn toml_version(version: &DependencyVersion) -> String {
    match version {
        DependencyVersion::Simple(expression) => toml::Value::String(expression.clone()).to_string(),
        other => other.to_string(),
    }
}
