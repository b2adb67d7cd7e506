//! Bump decision result types

use super::{ConstraintKind, Dependency, DependencyVersion};
use serde::Serialize;
use std::fmt;

/// Reason why a dependency was left unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Removed by --name, --exclude-name, --group or constraint filters
    Filtered,
    /// Not present in the resolved dependency listing
    NotResolved,
    /// Constraint kind whose meaning a single version cannot express
    NonBumpableConstraint(ConstraintKind),
    /// Inequality other than `>=`
    UnsupportedInequality(String),
    /// Version expression matches no known constraint kind
    Unclassifiable,
    /// Declared version already matches the resolved version
    AlreadyUpToDate,
    /// The dependency's entry could not be located when writing back
    SlotNotFound,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Filtered => write!(f, "filtered out"),
            SkipReason::NotResolved => write!(f, "not found in resolved dependencies"),
            SkipReason::NonBumpableConstraint(kind) => {
                write!(f, "{} constraint cannot be bumped", kind)
            }
            SkipReason::UnsupportedInequality(op) => {
                write!(f, "'{}' inequality cannot be bumped", op)
            }
            SkipReason::Unclassifiable => write!(f, "unrecognized version constraint"),
            SkipReason::AlreadyUpToDate => write!(f, "already up to date"),
            SkipReason::SlotNotFound => write!(f, "entry not found in pyproject.toml"),
        }
    }
}

/// Result of a bump decision for a single dependency
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpdateResult {
    /// Dependency version will be rewritten
    Update {
        /// The dependency as declared
        dependency: Dependency,
        /// The version value to write back
        new_version: DependencyVersion,
    },
    /// Dependency was left unchanged
    Skip {
        /// The dependency as declared
        dependency: Dependency,
        /// The reason for skipping
        reason: SkipReason,
    },
}

impl UpdateResult {
    /// Creates an Update result
    pub fn update(dependency: Dependency, new_version: DependencyVersion) -> Self {
        UpdateResult::Update {
            dependency,
            new_version,
        }
    }

    /// Creates a Skip result
    pub fn skip(dependency: Dependency, reason: SkipReason) -> Self {
        UpdateResult::Skip { dependency, reason }
    }

    /// Returns true if this is an update result
    pub fn is_update(&self) -> bool {
        matches!(self, UpdateResult::Update { .. })
    }

    /// Returns true if this is a skip result
    pub fn is_skip(&self) -> bool {
        matches!(self, UpdateResult::Skip { .. })
    }

    /// Returns the dependency reference
    pub fn dependency(&self) -> &Dependency {
        match self {
            UpdateResult::Update { dependency, .. } => dependency,
            UpdateResult::Skip { dependency, .. } => dependency,
        }
    }

    /// Returns the package name
    pub fn package_name(&self) -> &str {
        &self.dependency().name
    }

    /// Returns the bumped dependency for an update result
    pub fn bumped(&self) -> Option<Dependency> {
        match self {
            UpdateResult::Update {
                dependency,
                new_version,
            } => Some(dependency.with_version(new_version.clone())),
            UpdateResult::Skip { .. } => None,
        }
    }
}

impl fmt::Display for UpdateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateResult::Update {
                dependency,
                new_version,
            } => {
                write!(
                    f,
                    "{}: {} → {}",
                    dependency.name, dependency.version, new_version
                )
            }
            UpdateResult::Skip { dependency, reason } => {
                write!(f, "{}: skipped ({})", dependency.name, reason)
            }
        }
    }
}
