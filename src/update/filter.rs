//! Update filter configuration
//!
//! This module provides the UpdateFilter struct that encapsulates
//! all filter options applied before dependencies are requested or bumped.

use crate::domain::{ConstraintKind, Dependency};

/// Filter configuration for dependency selection
#[derive(Debug, Clone, Default)]
pub struct UpdateFilter {
    /// If non-empty, only process these dependency names
    pub names: Vec<String>,
    /// Dependency names to exclude
    pub exclude_names: Vec<String>,
    /// If non-empty, only process these groups
    pub groups: Vec<String>,
    /// Constraint kinds to leave alone
    pub without_constraints: Vec<ConstraintKind>,
}

impl UpdateFilter {
    /// Create a new UpdateFilter with default settings (process all)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set dependency names to include
    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.names = names;
        self
    }

    /// Set dependency names to exclude
    pub fn with_exclude_names(mut self, exclude_names: Vec<String>) -> Self {
        self.exclude_names = exclude_names;
        self
    }

    /// Set groups to include
    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups = groups;
        self
    }

    /// Set constraint kinds to ignore
    pub fn with_without_constraints(mut self, kinds: Vec<ConstraintKind>) -> Self {
        self.without_constraints = kinds;
        self
    }

    /// Check if a dependency passes every filter
    ///
    /// Names match after normalization, so `--name Poetry_Up` selects
    /// `poetry-up`. Unclassifiable constraints are never removed by the
    /// constraint filter.
    pub fn should_process(&self, dependency: &Dependency) -> bool {
        if let Some(kind) = dependency.constraint() {
            if self.without_constraints.contains(&kind) {
                return false;
            }
        }

        if !self.names.is_empty() && !self.names.iter().any(|n| dependency.matches_name(n)) {
            return false;
        }

        if self.exclude_names.iter().any(|n| dependency.matches_name(n)) {
            return false;
        }

        if !self.groups.is_empty() && !self.groups.iter().any(|g| g == dependency.group.name()) {
            return false;
        }

        true
    }
}
