//! Bump judgment logic for dependencies
//!
//! This module provides:
//! - Filter configuration from CLI args
//! - Parsing and reconciliation of Poetry's resolved listing
//! - The bump engine that rewrites a constraint to its resolved version

mod filter;
pub mod lock;

pub use filter::UpdateFilter;
pub use lock::{parse_listing, reconcile, LockedDependency, ResolvedPackage};

use crate::domain::{
    inequality_operator, tilde_operator, ConstraintKind, Dependency, DependencyVersion,
    ManifestUpdateResult, SkipReason, UpdateResult,
};
use std::path::Path;
use tracing::debug;

/// Rewrite a declared version to point at `resolved_version`
///
/// The constraint operator and the shape of the value are kept. Returns the
/// declared value unchanged when the constraint cannot be bumped.
pub fn compute_bumped_version(dependency: &Dependency, resolved_version: &str) -> DependencyVersion {
    bump(dependency, resolved_version).unwrap_or_else(|_| dependency.version.clone())
}

fn bump(dependency: &Dependency, resolved_version: &str) -> Result<DependencyVersion, SkipReason> {
    let kind = dependency.constraint().ok_or(SkipReason::Unclassifiable)?;
    if !kind.is_bumpable() {
        return Err(SkipReason::NonBumpableConstraint(kind));
    }
    let expression = dependency.version.expression().unwrap_or("");

    let bumped = match kind {
        ConstraintKind::Caret => format!("^{}", resolved_version),
        ConstraintKind::Tilde => {
            format!("{}{}", tilde_operator(expression).unwrap_or("~"), resolved_version)
        }
        ConstraintKind::Inequality => match inequality_operator(expression) {
            Some(">=") => format!(">={}", resolved_version),
            Some(op) => return Err(SkipReason::UnsupportedInequality(op.to_string())),
            None => return Err(SkipReason::Unclassifiable),
        },
        ConstraintKind::Exact => resolved_version.to_string(),
        _ => return Err(SkipReason::NonBumpableConstraint(kind)),
    };

    dependency
        .version
        .with_expression(&bumped)
        .ok_or(SkipReason::Unclassifiable)
}

/// Bump engine that decides whether to rewrite a dependency
pub struct BumpEngine {
    /// Filter configuration
    filter: UpdateFilter,
}

impl BumpEngine {
    /// Create a new BumpEngine with the given filter
    pub fn new(filter: UpdateFilter) -> Self {
        Self { filter }
    }

    /// Check if a dependency should be processed at all
    pub fn should_skip(&self, dependency: &Dependency) -> Option<SkipReason> {
        if !self.filter.should_process(dependency) {
            return Some(SkipReason::Filtered);
        }
        None
    }

    /// Judge a single dependency given the version Poetry resolved for it
    pub fn judge(&self, dependency: &Dependency, lock_version: Option<&str>) -> UpdateResult {
        if let Some(reason) = self.should_skip(dependency) {
            return UpdateResult::skip(dependency.clone(), reason);
        }

        let Some(lock_version) = lock_version else {
            return UpdateResult::skip(dependency.clone(), SkipReason::NotResolved);
        };

        match bump(dependency, lock_version) {
            Ok(version) if version == dependency.version => {
                UpdateResult::skip(dependency.clone(), SkipReason::AlreadyUpToDate)
            }
            Ok(version) => {
                debug!("{}: {} -> {}", dependency.name, dependency.version, version);
                UpdateResult::update(dependency.clone(), version)
            }
            Err(reason) => {
                debug!("{}: {}", dependency.name, reason);
                UpdateResult::skip(dependency.clone(), reason)
            }
        }
    }

    /// Judge every declared dependency against the resolved listing
    ///
    /// Produces exactly one result per declared dependency, in order.
    pub fn judge_all(
        &self,
        path: &Path,
        declared: &[Dependency],
        listing: &[ResolvedPackage],
    ) -> ManifestUpdateResult {
        let selected: Vec<Dependency> = declared
            .iter()
            .filter(|d| self.should_skip(d).is_none())
            .cloned()
            .collect();
        let locked = reconcile(&selected, listing);

        let mut result = ManifestUpdateResult::new(path);
        for dependency in declared {
            let lock_version = locked
                .iter()
                .find(|l| &l.dependency == dependency)
                .map(|l| l.lock_version.as_str());
            result.add_result(self.judge(dependency, lock_version));
        }
        result
    }
}
