//! Poetry integration
//!
//! This module provides:
//! - The `PackageManager` trait the orchestrator drives
//! - Detection of the installed Poetry version
//! - Invocation shapes of `add` and `lock`, which differ across Poetry releases

use crate::domain::DependencyGroup;
use crate::error::CommandError;
use regex::Regex;
use semver::Version;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// `major.minor[.patch]` prefix of the last token of `poetry --version`
static POETRY_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").unwrap());

/// First release with dependency groups (`--group`)
pub const GROUPS_SINCE: Version = Version::new(1, 2, 0);

/// First release where `lock` no longer upgrades by default
pub const LOCK_NO_UPDATE_DROPPED: Version = Version::new(2, 0, 0);

/// Operations the updater needs from the package manager
pub trait PackageManager {
    /// Installed package manager version
    fn version(&self) -> &Version;

    /// Update every dependency within its current constraint
    fn update(&self) -> Result<(), CommandError>;

    /// Resolved dependency listing (`show --tree`)
    fn show_tree(&self) -> Result<String, CommandError>;

    /// Request the latest version of `packages` in `group`
    ///
    /// Returns false when this package manager version cannot address
    /// `group`, in which case nothing was run.
    fn add_latest(&self, packages: &[String], group: &DependencyGroup) -> Result<bool, CommandError>;

    /// Refresh the lock file without upgrading anything
    fn lock(&self) -> Result<(), CommandError>;
}

/// Parse the output of `poetry --version`
///
/// Accepts both `Poetry version 1.1.13` and `Poetry (version 1.8.2)`.
pub fn parse_poetry_version(output: &str) -> Result<Version, CommandError> {
    let token = output
        .split_whitespace()
        .last()
        .map(|t| t.trim_end_matches(')'))
        .unwrap_or("");

    let captures = POETRY_VERSION_RE
        .captures(token)
        .filter(|c| c.get(0).map(|m| m.start()) == Some(0))
        .ok_or_else(|| CommandError::version_parse(output.trim()))?;

    let part = |i: usize| -> Result<u64, CommandError> {
        captures
            .get(i)
            .map_or(Ok(0), |m| m.as_str().parse::<u64>())
            .map_err(|_| CommandError::version_parse(output.trim()))
    };

    Ok(Version::new(part(1)?, part(2)?, part(3)?))
}

/// Arguments of `poetry add` requesting `packages` in `group`
///
/// Returns `None` if `version` has no way to address `group`.
pub fn add_args(version: &Version, packages: &[String], group: &DependencyGroup) -> Option<Vec<String>> {
    let mut args = vec!["add".to_string()];
    args.extend(packages.iter().map(|p| format!("{}@latest", p)));

    match group {
        DependencyGroup::Default => {}
        DependencyGroup::Dev if *version < GROUPS_SINCE => args.push("--dev".to_string()),
        _ if *version >= GROUPS_SINCE => {
            args.push("--group".to_string());
            args.push(group.name().to_string());
        }
        _ => return None,
    }

    Some(args)
}

/// Arguments of `poetry lock` that refresh without upgrading
pub fn lock_args(version: &Version) -> Vec<String> {
    if *version < LOCK_NO_UPDATE_DROPPED {
        vec!["lock".to_string(), "--no-update".to_string()]
    } else {
        vec!["lock".to_string()]
    }
}

/// Poetry executable run in a project directory
#[derive(Debug, Clone)]
pub struct Poetry {
    program: PathBuf,
    working_dir: PathBuf,
    version: Version,
}

impl Poetry {
    /// Create a runner with a known version
    pub fn new(program: impl Into<PathBuf>, working_dir: impl Into<PathBuf>, version: Version) -> Self {
        Self {
            program: program.into(),
            working_dir: working_dir.into(),
            version,
        }
    }

    /// Create a runner, reading the version from `poetry --version`
    pub fn detect(program: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Result<Self, CommandError> {
        let program = program.into();
        let working_dir = working_dir.into();
        let output = run_command(&program, &["--version".to_string()], &working_dir)?;
        let version = parse_poetry_version(&output)?;
        Ok(Self::new(program, working_dir, version))
    }

    fn run(&self, args: &[String]) -> Result<String, CommandError> {
        run_command(&self.program, args, &self.working_dir)
    }
}

impl PackageManager for Poetry {
    fn version(&self) -> &Version {
        &self.version
    }

    fn update(&self) -> Result<(), CommandError> {
        self.run(&["update".to_string()]).map(|_| ())
    }

    fn show_tree(&self) -> Result<String, CommandError> {
        self.run(&["show".to_string(), "--tree".to_string()])
    }

    fn add_latest(&self, packages: &[String], group: &DependencyGroup) -> Result<bool, CommandError> {
        if packages.is_empty() {
            return Ok(true);
        }
        match add_args(&self.version, packages, group) {
            Some(args) => self.run(&args).map(|_| true),
            None => {
                warn!(
                    "Couldn't add package(s) '{}': poetry {} does not support group '{}'",
                    packages.join(", "),
                    self.version,
                    group
                );
                Ok(false)
            }
        }
    }

    fn lock(&self) -> Result<(), CommandError> {
        self.run(&lock_args(&self.version)).map(|_| ())
    }
}

/// Run a command and capture its standard output
fn run_command(program: &Path, args: &[String], working_dir: &Path) -> Result<String, CommandError> {
    let command = describe(program, args);
    debug!("Running '{}' in {}", command, working_dir.display());

    let output: Output = Command::new(program)
        .args(args)
        .current_dir(working_dir)
        .output()
        .map_err(|e| CommandError::spawn_failed(&command, e))?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    if output.status.success() {
        Ok(stdout)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let combined = if stderr.trim().is_empty() {
            stdout
        } else {
            stderr.to_string()
        };
        Err(CommandError::failed(command, output.status.code(), combined))
    }
}

fn describe(program: &Path, args: &[String]) -> String {
    let mut parts = vec![program.display().to_string()];
    parts.extend(args.iter().cloned());
    parts.join(" ")
}
