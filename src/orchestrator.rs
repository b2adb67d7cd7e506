//! Update orchestrator for coordinating the entire update workflow
//!
//! This module provides:
//! - Workflow coordination: load → update/add → show → bump → write → lock
//! - Dry-run mode support (read-only poetry commands, no file writes)
//! - Filter application before both `add` batching and bumping
//! - Non-fatal diagnostics collected alongside the result

use crate::cli::CliArgs;
use crate::domain::{Dependency, DependencyGroup, DependencyVersion, ManifestUpdateResult};
use crate::error::AppError;
use crate::manifest::{load_manifest, ManifestWriter};
use crate::package_manager::PackageManager;
use crate::progress::Progress;
use crate::update::{parse_listing, BumpEngine, UpdateFilter};
use std::path::Path;
use tracing::{info, warn};

/// Run options derived from the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Request each dependency's latest version instead of `poetry update`
    pub latest: bool,
    /// Don't run mutating commands or write files
    pub dry_run: bool,
    /// Refresh poetry.lock after the manifest is written
    pub lock: bool,
    /// Show spinners while poetry runs
    pub show_progress: bool,
}

impl RunOptions {
    /// Build run options from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Self {
        Self {
            latest: args.latest,
            dry_run: args.dry_run,
            lock: !args.no_lock,
            show_progress: !args.quiet && !args.json,
        }
    }
}

/// Orchestrator for coordinating the update workflow
pub struct Orchestrator {
    options: RunOptions,
    filter: UpdateFilter,
}

/// Result of running the orchestrator
#[derive(Debug)]
pub struct OrchestratorResult {
    /// Bump results for the manifest
    pub manifest: ManifestUpdateResult,
    /// Manifest text as loaded
    pub original: String,
    /// Manifest text after bumping (not written in dry-run mode)
    pub updated: String,
    /// Whether the manifest file was written
    pub written: bool,
    /// Whether poetry.lock was refreshed
    pub lock_refreshed: bool,
    /// Whether this was a dry run
    pub dry_run: bool,
    /// Non-fatal problems encountered during processing
    pub errors: Vec<OrchestratorError>,
}

impl OrchestratorResult {
    /// Number of dependencies bumped
    pub fn total_updates(&self) -> usize {
        self.manifest.update_count()
    }
}

/// Non-fatal problems that can occur during orchestration
#[derive(Debug, Clone, PartialEq)]
pub enum OrchestratorError {
    /// The installed poetry cannot address a group with `add`
    UnsupportedGroup {
        group: String,
        packages: Vec<String>,
    },
    /// A bumped dependency's entry was not found when writing
    SlotNotFound { path: String, message: String },
}

impl std::fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorError::UnsupportedGroup { group, packages } => write!(
                f,
                "Couldn't add package(s) '{}' to group '{}'",
                packages.join(", "),
                group
            ),
            OrchestratorError::SlotNotFound { path, message } => {
                write!(f, "{}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for OrchestratorError {}

/// Group `@latest` requests by dependency group, in first-appearance order
///
/// Only plain-string dependencies are requested; re-adding a structured
/// record would lose its sibling fields.
pub fn latest_batches(dependencies: &[Dependency]) -> Vec<(DependencyGroup, Vec<String>)> {
    let mut batches: Vec<(DependencyGroup, Vec<String>)> = Vec::new();
    for dependency in dependencies {
        if !matches!(dependency.version, DependencyVersion::Simple(_)) {
            continue;
        }
        match batches.iter_mut().find(|(g, _)| *g == dependency.group) {
            Some((_, names)) => names.push(dependency.name.clone()),
            None => batches.push((dependency.group.clone(), vec![dependency.name.clone()])),
        }
    }
    batches
}

impl Orchestrator {
    /// Create a new orchestrator
    pub fn new(options: RunOptions, filter: UpdateFilter) -> Self {
        Self { options, filter }
    }

    /// Create an orchestrator from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Self {
        Self::new(RunOptions::from_cli(args), args.build_filter())
    }

    /// Run the update workflow on the manifest at `manifest_path`
    ///
    /// Fatal errors (unreadable manifest, failing poetry command, failed
    /// write) abort the run. A failing command aborts before anything is
    /// written.
    pub fn run(
        &self,
        manifest_path: &Path,
        package_manager: &dyn PackageManager,
    ) -> Result<OrchestratorResult, AppError> {
        info!("Using poetry {}", package_manager.version());
        let mut progress = Progress::new(self.options.show_progress);
        let mut errors = Vec::new();

        // Step 1: Load the manifest
        let mut document = load_manifest(manifest_path)?;
        let original = document.dump();
        let declared = document.dependencies();
        info!(
            "Found {} dependencies in {}",
            declared.len(),
            manifest_path.display()
        );

        let selected: Vec<Dependency> = declared
            .iter()
            .filter(|d| self.filter.should_process(d))
            .cloned()
            .collect();

        // Step 2: Let poetry move the lock state forward
        if self.options.dry_run {
            info!("Dry run: using the current lock state");
        } else if self.options.latest {
            info!("Updating dependencies to their latest version");
            let batches = latest_batches(&selected);
            progress.start_batches(batches.len());
            for (group, packages) in &batches {
                progress.batch(group);
                let added = package_manager.add_latest(packages, group)?;
                progress.batch_done();
                if !added {
                    errors.push(OrchestratorError::UnsupportedGroup {
                        group: group.to_string(),
                        packages: packages.clone(),
                    });
                }
            }
            progress.clear();
        } else {
            info!("Running poetry update command");
            progress.command("update", || package_manager.update())?;
        }

        // Step 3: Read resolved versions
        let listing = progress.command("show --tree", || package_manager.show_tree())?;
        let listing = parse_listing(&listing);

        // Step 4: Bump and apply
        let engine = BumpEngine::new(self.filter.clone());
        let mut manifest = engine.judge_all(manifest_path, &declared, &listing);

        let writer =
            ManifestWriter::new(self.options.dry_run).with_always_write(self.options.latest);
        let write_result = writer.apply_updates(&mut document, &mut manifest)?;
        for message in &write_result.errors {
            errors.push(OrchestratorError::SlotNotFound {
                path: write_result.path.display().to_string(),
                message: message.clone(),
            });
        }

        // Step 5: Refresh the lock file
        let mut lock_refreshed = false;
        if write_result.file_modified && self.options.lock {
            progress.command("lock", || package_manager.lock())?;
            lock_refreshed = true;
        } else if write_result.file_modified {
            warn!("poetry.lock was not refreshed; run 'poetry lock' to sync it");
        }

        Ok(OrchestratorResult {
            manifest,
            original,
            updated: document.dump(),
            written: write_result.file_modified,
            lock_refreshed,
            dry_run: self.options.dry_run,
            errors,
        })
    }
}
