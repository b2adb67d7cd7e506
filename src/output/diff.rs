//! Diff output formatter for showing changes
//!
//! This module provides:
//! - Unified diff format display
//! - Before/after version comparison in manifest syntax

use crate::domain::{ManifestUpdateResult, UpdateResult};
use crate::orchestrator::OrchestratorResult;
use crate::output::{toml_version, OutputFormatter};
use std::io::Write;

/// Diff formatter for showing version changes
pub struct DiffFormatter {
    /// Whether this is a dry-run
    dry_run: bool,
}

impl DiffFormatter {
    /// Create a new diff formatter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    fn dry_run_prefix(&self) -> &'static str {
        if self.dry_run {
            "(dry-run) "
        } else {
            ""
        }
    }

    fn verb(&self) -> &'static str {
        if self.dry_run {
            "would be bumped"
        } else {
            "bumped"
        }
    }
}

impl OutputFormatter for DiffFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();
        let manifest = &result.manifest;

        if manifest.has_updates() {
            writeln!(writer, "{}--- a/{}", prefix, manifest.path.display())?;
            writeln!(writer, "{}+++ b/{}", prefix, manifest.path.display())?;

            for entry in manifest.updates() {
                if let UpdateResult::Update {
                    dependency,
                    new_version,
                } = entry
                {
                    writeln!(writer, "@@ {} ({}) @@", dependency.name, dependency.group)?;
                    writeln!(
                        writer,
                        "-{} = {}",
                        dependency.name,
                        toml_version(&dependency.version)
                    )?;
                    writeln!(writer, "+{} = {}", dependency.name, toml_version(new_version))?;
                }
            }

            writeln!(writer)?;
        }

        self.format_summary(manifest, writer)
    }

    fn format_summary(
        &self,
        manifest: &ManifestUpdateResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        writeln!(
            writer,
            "{}# {} package(s) {}",
            self.dry_run_prefix(),
            manifest.update_count(),
            self.verb()
        )
    }
}
