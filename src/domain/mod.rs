//! Core domain models for poetryup
//!
//! This module contains the fundamental types used throughout the application:
//! - Constraint kinds and their classification
//! - Dependency, group and version value structures
//! - Bump decision results
//! - Per-manifest summary

mod constraint;
mod dependency;
mod summary;
mod update_result;

pub use constraint::{
    classify, classify_expression, inequality_operator, tilde_operator, ConstraintKind,
};
pub use dependency::{normalize_name, Dependency, DependencyGroup, DependencyVersion};
pub use summary::ManifestUpdateResult;
pub use update_result::{SkipReason, UpdateResult};
