//! Manifest file writing and update operations
//!
//! This module provides:
//! - ManifestWriter for applying bumped versions to a loaded pyproject.toml
//! - Dry-run mode support (no actual file modifications)
//! - Slot lookup failures downgraded to skips, never aborting the run

use crate::domain::{ManifestUpdateResult, SkipReason, UpdateResult};
use crate::error::ManifestError;
use crate::manifest::Pyproject;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Writer that applies bump results to a manifest document
pub struct ManifestWriter {
    /// Whether to run in dry-run mode (no file modifications)
    dry_run: bool,
    /// Write the document even when no update landed
    always_write: bool,
}

/// Result of applying updates to a manifest file
#[derive(Debug)]
pub struct WriteResult {
    /// Path to the manifest file
    pub path: std::path::PathBuf,
    /// Number of updates successfully applied
    pub updates_applied: usize,
    /// Number of updates whose slot could not be found
    pub updates_failed: usize,
    /// Whether the file was actually modified
    pub file_modified: bool,
    /// Errors encountered during update
    pub errors: Vec<String>,
}

impl WriteResult {
    fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            path: path.into(),
            updates_applied: 0,
            updates_failed: 0,
            file_modified: false,
            errors: Vec::new(),
        }
    }
}

impl ManifestWriter {
    /// Create a new ManifestWriter
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            always_write: false,
        }
    }

    /// Write the document back even without updates
    ///
    /// Needed after `poetry add`, which rewrites constraints on its own.
    pub fn with_always_write(mut self, always_write: bool) -> Self {
        self.always_write = always_write;
        self
    }

    /// Apply every `Update` in `manifest_result` to `document`
    ///
    /// Updates whose slot cannot be located are turned into
    /// `Skip { reason: SlotNotFound }` in place. The document is written to
    /// its path when at least one update landed (or `always_write` is set) and
    /// this is not a dry run.
    pub fn apply_updates(
        &self,
        document: &mut Pyproject,
        manifest_result: &mut ManifestUpdateResult,
    ) -> Result<WriteResult, ManifestError> {
        let mut result = WriteResult::new(document.path());

        for entry in manifest_result.results.iter_mut() {
            let Some(bumped) = entry.bumped() else {
                continue;
            };

            if document.set_version(&bumped) {
                result.updates_applied += 1;
            } else {
                warn!("Couldn't bump dependency '{}' ({})", bumped.name, bumped.group);
                result.updates_failed += 1;
                result
                    .errors
                    .push(format!("Couldn't bump dependency '{}'", bumped.name));
                *entry = UpdateResult::skip(entry.dependency().clone(), SkipReason::SlotNotFound);
            }
        }
        manifest_result.modified = result.updates_applied > 0;

        if (result.updates_applied > 0 || self.always_write) && !self.dry_run {
            write_manifest(document.path(), &document.dump())?;
            result.file_modified = true;
            info!(
                "Wrote {} bumped version(s) to {}",
                result.updates_applied,
                document.path().display()
            );
        }

        Ok(result)
    }
}

/// Read a manifest file content
///
/// A missing file is reported as `NotFound` for its directory.
pub fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ManifestError::not_found(path.parent().unwrap_or(path))
        } else {
            ManifestError::read_error(path, e)
        }
    })
}

/// Write content to a manifest file
pub fn write_manifest(path: &Path, content: &str) -> Result<(), ManifestError> {
    fs::write(path, content).map_err(|e| ManifestError::write_error(path, e))
}
