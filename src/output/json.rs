//! JSON output formatter for machine processing
//!
//! Every declared dependency shows up either under `updates` or `skips`.

use crate::domain::{ManifestUpdateResult, UpdateResult};
use crate::orchestrator::OrchestratorResult;
use crate::output::OutputFormatter;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
#[derive(Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput {
    /// Whether this was a dry-run
    dry_run: bool,
    /// Summary statistics
    summary: JsonSummary,
    /// Manifest result
    manifest: JsonManifest,
    /// Whether poetry.lock was refreshed
    lock_refreshed: bool,
    /// Errors encountered
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

#[derive(Serialize)]
struct JsonSummary {
    updates: usize,
    skips: usize,
}

#[derive(Serialize)]
struct JsonManifest {
    path: String,
    updates: Vec<JsonUpdate>,
    skips: Vec<JsonSkip>,
}

/// JSON representation of an update
#[derive(Serialize)]
struct JsonUpdate {
    /// Package name
    name: String,
    /// Dependency group ("default", "dev" or a named group)
    group: String,
    /// Old version value
    from: String,
    /// New version value
    to: String,
}

/// JSON representation of a skip
#[derive(Serialize)]
struct JsonSkip {
    name: String,
    group: String,
    version: String,
    reason: String,
}

impl JsonFormatter {
    fn manifest_to_json(manifest: &ManifestUpdateResult) -> JsonManifest {
        let mut updates = Vec::new();
        let mut skips = Vec::new();

        for result in &manifest.results {
            match result {
                UpdateResult::Update {
                    dependency,
                    new_version,
                } => updates.push(JsonUpdate {
                    name: dependency.name.clone(),
                    group: dependency.group.name().to_string(),
                    from: dependency.version.to_string(),
                    to: new_version.to_string(),
                }),
                UpdateResult::Skip { dependency, reason } => skips.push(JsonSkip {
                    name: dependency.name.clone(),
                    group: dependency.group.name().to_string(),
                    version: dependency.version.to_string(),
                    reason: reason.to_string(),
                }),
            }
        }

        JsonManifest {
            path: manifest.path.display().to_string(),
            updates,
            skips,
        }
    }

    fn summary_to_json(manifest: &ManifestUpdateResult) -> JsonSummary {
        JsonSummary {
            updates: manifest.update_count(),
            skips: manifest.skip_count(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            dry_run: result.dry_run,
            summary: Self::summary_to_json(&result.manifest),
            manifest: Self::manifest_to_json(&result.manifest),
            lock_refreshed: result.lock_refreshed,
            errors: result.errors.iter().map(|e| e.to_string()).collect(),
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)?;
        Ok(())
    }

    fn format_summary(
        &self,
        manifest: &ManifestUpdateResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, &Self::summary_to_json(manifest))?;
        writeln!(writer)?;
        Ok(())
    }
}
