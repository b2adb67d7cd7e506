//! Update result summary types
//!
//! Provides the per-manifest record of every bump decision taken in a run.

use super::UpdateResult;
use serde::Serialize;
use std::path::PathBuf;

/// Bump results for a single pyproject.toml
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestUpdateResult {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Individual dependency results, in declaration order
    pub results: Vec<UpdateResult>,
    /// Whether the document was changed
    pub modified: bool,
}

impl ManifestUpdateResult {
    /// Creates a new ManifestUpdateResult
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            results: Vec::new(),
            modified: false,
        }
    }

    /// Adds a result
    pub fn add_result(&mut self, result: UpdateResult) {
        if result.is_update() {
            self.modified = true;
        }
        self.results.push(result);
    }

    /// Returns the number of updates
    pub fn update_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_update()).count()
    }

    /// Returns the number of skips
    pub fn skip_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_skip()).count()
    }

    /// Returns all updates
    pub fn updates(&self) -> impl Iterator<Item = &UpdateResult> {
        self.results.iter().filter(|r| r.is_update())
    }

    /// Returns all skips
    pub fn skips(&self) -> impl Iterator<Item = &UpdateResult> {
        self.results.iter().filter(|r| r.is_skip())
    }

    /// Returns true if any dependencies were updated
    pub fn has_updates(&self) -> bool {
        self.update_count() > 0
    }
}
