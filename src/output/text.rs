//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Human-readable bump display with colors
//! - Semantic version change type indication (major/minor/patch)
//! - Group tags for non-default dependency groups
//! - Skipped dependency display with reasons (verbose)

use crate::domain::{Dependency, ManifestUpdateResult, SkipReason, UpdateResult};
use crate::orchestrator::OrchestratorResult;
use crate::output::{short_version, OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Semantic version change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionChangeType {
    /// Major version change (breaking)
    Major,
    /// Minor version change (features)
    Minor,
    /// Patch version change (fixes)
    Patch,
    /// Unknown or unparseable
    Unknown,
}

impl VersionChangeType {
    /// Determine the change type between two version expressions
    ///
    /// Leading constraint operators (`^`, `~`, `~=`, `>=`) are ignored.
    pub fn from_versions(old: &str, new: &str) -> Self {
        let parse = |v: &str| -> Option<(u64, u64, u64)> {
            let v = v.trim_start_matches(['^', '~', '=', '>', '<', '!', ' ']);
            let parts: Vec<&str> = v.split(['.', '-']).collect();
            match parts.len() {
                0 => None,
                1 => Some((parts[0].parse().ok()?, 0, 0)),
                2 => Some((parts[0].parse().ok()?, parts[1].parse().ok()?, 0)),
                _ => Some((
                    parts[0].parse().ok()?,
                    parts[1].parse().ok()?,
                    parts[2].parse().ok()?,
                )),
            }
        };

        match (parse(old), parse(new)) {
            (Some((old_major, old_minor, _)), Some((new_major, new_minor, _))) => {
                if new_major != old_major {
                    VersionChangeType::Major
                } else if new_minor != old_minor {
                    VersionChangeType::Minor
                } else {
                    VersionChangeType::Patch
                }
            }
            _ => VersionChangeType::Unknown,
        }
    }

    /// Get the display label with color
    pub fn colored_label(&self) -> String {
        match self {
            VersionChangeType::Major => "major".red().bold().to_string(),
            VersionChangeType::Minor => "minor".yellow().to_string(),
            VersionChangeType::Patch => "patch".green().to_string(),
            VersionChangeType::Unknown => "?".dimmed().to_string(),
        }
    }

    /// Get the plain label
    pub fn label(&self) -> &'static str {
        match self {
            VersionChangeType::Major => "major",
            VersionChangeType::Minor => "minor",
            VersionChangeType::Patch => "patch",
            VersionChangeType::Unknown => "?",
        }
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    verbosity: Verbosity,
    dry_run: bool,
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter; `color` is off when stdout is not a terminal
    pub fn new(verbosity: Verbosity, dry_run: bool, color: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color,
        }
    }

    fn dry_run_prefix(&self) -> String {
        if self.dry_run {
            if self.color {
                format!("{} ", "(dry-run)".cyan())
            } else {
                "(dry-run) ".to_string()
            }
        } else {
            String::new()
        }
    }

    fn group_tag(dependency: &Dependency) -> String {
        if dependency.group.is_default() {
            String::new()
        } else {
            format!(" ({})", dependency.group)
        }
    }

    fn max_name_length(results: &[&UpdateResult]) -> usize {
        results
            .iter()
            .map(|r| r.package_name().len())
            .max()
            .unwrap_or(0)
    }

    fn format_update_line(
        &self,
        dependency: &Dependency,
        old_version: &str,
        new_version: &str,
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let change_type = VersionChangeType::from_versions(old_version, new_version);
        let group = Self::group_tag(dependency);

        if self.color {
            let name_display = format!("{:width$}", dependency.name, width = max_name_len);
            writeln!(
                writer,
                "  {} {} {} {} [{}]{}",
                name_display,
                old_version.dimmed(),
                "→".dimmed(),
                new_version.bright_white().bold(),
                change_type.colored_label(),
                group.dimmed()
            )
        } else {
            writeln!(
                writer,
                "  {:width$} {} -> {} [{}]{}",
                dependency.name,
                old_version,
                new_version,
                change_type.label(),
                group,
                width = max_name_len
            )
        }
    }

    fn format_skip_line(
        &self,
        dependency: &Dependency,
        reason: &SkipReason,
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let detail = format!(
            "{} ({}){}",
            short_version(&dependency.version),
            reason,
            Self::group_tag(dependency)
        );

        if self.color {
            let name_display = format!("{:width$}", dependency.name, width = max_name_len);
            writeln!(writer, "  {} {}", name_display.dimmed(), detail.dimmed())
        } else {
            writeln!(
                writer,
                "  {:width$} {}",
                dependency.name,
                detail,
                width = max_name_len
            )
        }
    }

    fn format_manifest(
        &self,
        manifest: &ManifestUpdateResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let updates: Vec<&UpdateResult> = manifest.updates().collect();
        let skips: Vec<&UpdateResult> = manifest.skips().collect();
        let verbose = self.verbosity == Verbosity::Verbose;

        if updates.is_empty() && (!verbose || skips.is_empty()) {
            return Ok(());
        }

        let path_display = manifest.path.display().to_string();
        let prefix = self.dry_run_prefix();
        if self.color {
            writeln!(
                writer,
                "{}{} — {} {}, {} {}",
                prefix,
                path_display.bold(),
                updates.len().to_string().green(),
                if updates.len() == 1 { "update" } else { "updates" },
                skips.len().to_string().dimmed(),
                if skips.len() == 1 { "skip" } else { "skips" }
            )?;
        } else {
            writeln!(
                writer,
                "{}{} — {} updates, {} skips",
                prefix,
                path_display,
                updates.len(),
                skips.len()
            )?;
        }

        let max_name_len = Self::max_name_length(&updates).max(20);
        for result in &updates {
            if let UpdateResult::Update {
                dependency,
                new_version,
            } = result
            {
                self.format_update_line(
                    dependency,
                    &short_version(&dependency.version),
                    &short_version(new_version),
                    max_name_len,
                    writer,
                )?;
            }
        }

        if verbose && !skips.is_empty() {
            writeln!(writer)?;
            if self.color {
                writeln!(writer, "  {}", "Skipped:".dimmed())?;
            } else {
                writeln!(writer, "  Skipped:")?;
            }
            let skip_max_len = Self::max_name_length(&skips).max(20);
            for result in &skips {
                if let UpdateResult::Skip { dependency, reason } = result {
                    self.format_skip_line(dependency, reason, skip_max_len, writer)?;
                }
            }
        }

        writeln!(writer)?;
        Ok(())
    }

    /// Count updates by change type: (major, minor, patch, unknown)
    fn count_by_change_type(manifest: &ManifestUpdateResult) -> (usize, usize, usize, usize) {
        let mut counts = (0, 0, 0, 0);
        for result in manifest.updates() {
            if let UpdateResult::Update {
                dependency,
                new_version,
            } = result
            {
                match VersionChangeType::from_versions(
                    &short_version(&dependency.version),
                    &short_version(new_version),
                ) {
                    VersionChangeType::Major => counts.0 += 1,
                    VersionChangeType::Minor => counts.1 += 1,
                    VersionChangeType::Patch => counts.2 += 1,
                    VersionChangeType::Unknown => counts.3 += 1,
                }
            }
        }
        counts
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return self.format_summary(&result.manifest, writer);
        }

        self.format_manifest(&result.manifest, writer)?;

        if !result.errors.is_empty() {
            if self.color {
                writeln!(writer, "{}:", "Errors".red().bold())?;
            } else {
                writeln!(writer, "Errors:")?;
            }
            for error in &result.errors {
                if self.color {
                    writeln!(writer, "  {} {}", "✗".red(), error)?;
                } else {
                    writeln!(writer, "  - {}", error)?;
                }
            }
            writeln!(writer)?;
        }

        self.format_summary(&result.manifest, writer)?;

        if result.lock_refreshed && self.verbosity == Verbosity::Verbose {
            writeln!(writer, "  poetry.lock refreshed")?;
        }

        Ok(())
    }

    fn format_summary(
        &self,
        manifest: &ManifestUpdateResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();
        let updates = manifest.update_count();
        let skips = manifest.skip_count();

        if self.verbosity == Verbosity::Quiet {
            if updates > 0 {
                if self.color {
                    writeln!(writer, "{}{} bumped", prefix, updates.to_string().green())?;
                } else {
                    writeln!(writer, "{}{} bumped", prefix, updates)?;
                }
            } else if self.color {
                writeln!(writer, "{}{}", prefix, "No updates".dimmed())?;
            } else {
                writeln!(writer, "{}No updates", prefix)?;
            }
            return Ok(());
        }

        let (major, minor, patch, unknown) = Self::count_by_change_type(manifest);
        let mut parts = Vec::new();
        if major > 0 {
            parts.push(format!("{} major", major));
        }
        if minor > 0 {
            parts.push(format!("{} minor", minor));
        }
        if patch > 0 {
            parts.push(format!("{} patch", patch));
        }
        if unknown > 0 {
            parts.push(format!("{} other", unknown));
        }

        if self.color {
            writeln!(writer, "{}{}:", prefix, "Summary".bold())?;
        } else {
            writeln!(writer, "{}Summary:", prefix)?;
        }

        if updates > 0 {
            let count = if self.color {
                updates.to_string().green().to_string()
            } else {
                updates.to_string()
            };
            writeln!(
                writer,
                "  {} dependency(ies) bumped ({})",
                count,
                parts.join(", ")
            )?;
        } else if self.color {
            writeln!(writer, "  {}", "No dependencies bumped".dimmed())?;
        } else {
            writeln!(writer, "  No dependencies bumped")?;
        }

        if skips > 0 {
            writeln!(writer, "  {} dependency(ies) left unchanged", skips)?;
        }

        Ok(())
    }
}
