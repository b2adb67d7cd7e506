//! Constraint kinds of Poetry version expressions
//!
//! Classification follows the Poetry dependency specification:
//! - Caret: `^1.2.3`
//! - Tilde: `~1.2.3`, `~=1.2`
//! - Wildcard: `*`, `1.*`
//! - Inequality: `>=1.2`, `>1.2`, `<2.0`, `<=2.0`, `!=1.5`
//! - Exact: `1.2.3`
//! - Multiple requirements: `>=1.2,<2.0`
//! - Multiple constraints: a list of `{ version = ..., python = ... }` records

use super::DependencyVersion;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inequality operators, longest first so `>=` is not read as `>`
const INEQUALITY_OPERATORS: [&str; 5] = [">=", "<=", "!=", ">", "<"];

/// The kind of constraint a version expression uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// List of alternative constraint records
    MultipleConstraints,
    /// Comma separated requirements in a single string (e.g., `>=1.0,<2.0`)
    MultipleRequirements,
    /// Caret requirement (e.g., `^1.2.3`)
    Caret,
    /// Tilde requirement (e.g., `~1.2.3`)
    Tilde,
    /// Wildcard requirement (e.g., `1.*`)
    Wildcard,
    /// Inequality requirement (e.g., `>=1.2.3`, `!=1.5`)
    Inequality,
    /// Exact version (e.g., `1.2.3`)
    Exact,
}

impl ConstraintKind {
    /// All constraint kinds, in classification precedence order
    pub fn all() -> &'static [ConstraintKind] {
        &[
            ConstraintKind::MultipleConstraints,
            ConstraintKind::MultipleRequirements,
            ConstraintKind::Caret,
            ConstraintKind::Tilde,
            ConstraintKind::Wildcard,
            ConstraintKind::Inequality,
            ConstraintKind::Exact,
        ]
    }

    /// Returns the command line name of this kind
    pub fn name(&self) -> &'static str {
        match self {
            ConstraintKind::MultipleConstraints => "multiple-constraints",
            ConstraintKind::MultipleRequirements => "multiple-requirements",
            ConstraintKind::Caret => "caret",
            ConstraintKind::Tilde => "tilde",
            ConstraintKind::Wildcard => "wildcard",
            ConstraintKind::Inequality => "inequality",
            ConstraintKind::Exact => "exact",
        }
    }

    /// Returns true if a dependency of this kind can ever be bumped
    ///
    /// Multi-clause and wildcard constraints cannot be reduced to a single
    /// resolved version without changing their meaning.
    pub fn is_bumpable(&self) -> bool {
        !matches!(
            self,
            ConstraintKind::MultipleConstraints
                | ConstraintKind::MultipleRequirements
                | ConstraintKind::Wildcard
        )
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ConstraintKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        ConstraintKind::all()
            .iter()
            .find(|kind| kind.name() == wanted)
            .copied()
            .ok_or_else(|| format!("unknown constraint kind: {}", s))
    }
}

/// Classify a dependency's version value
///
/// Returns `None` when the expression does not match any known kind.
pub fn classify(version: &DependencyVersion) -> Option<ConstraintKind> {
    match version {
        DependencyVersion::Multiple(_) => Some(ConstraintKind::MultipleConstraints),
        DependencyVersion::Simple(_) | DependencyVersion::Detailed(_) => {
            classify_expression(version.expression().unwrap_or(""))
        }
    }
}

/// Classify a single version expression string
pub fn classify_expression(expression: &str) -> Option<ConstraintKind> {
    let expression = expression.trim();

    if expression.contains(',') {
        Some(ConstraintKind::MultipleRequirements)
    } else if expression.starts_with('^') {
        Some(ConstraintKind::Caret)
    } else if expression.starts_with('~') {
        Some(ConstraintKind::Tilde)
    } else if expression.contains('*') {
        Some(ConstraintKind::Wildcard)
    } else if inequality_operator(expression).is_some() {
        Some(ConstraintKind::Inequality)
    } else if expression.starts_with(|c: char| c.is_ascii_digit()) {
        Some(ConstraintKind::Exact)
    } else {
        None
    }
}

/// Returns the inequality operator an expression starts with
pub fn inequality_operator(expression: &str) -> Option<&'static str> {
    let expression = expression.trim_start();
    INEQUALITY_OPERATORS
        .iter()
        .find(|op| expression.starts_with(**op))
        .copied()
}

/// Returns the tilde operator an expression starts with (`~=` or `~`)
pub fn tilde_operator(expression: &str) -> Option<&'static str> {
    let expression = expression.trim_start();
    if expression.starts_with("~=") {
        Some("~=")
    } else if expression.starts_with('~') {
        Some("~")
    } else {
        None
    }
}
