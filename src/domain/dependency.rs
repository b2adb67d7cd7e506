//! Dependency information structures

use super::{classify, ConstraintKind};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Normalize a package name for matching (lowercase, `_` replaced by `-`)
pub fn normalize_name(name: &str) -> String {
    name.replace('_', "-").to_lowercase()
}

/// The group a dependency is declared in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DependencyGroup {
    /// `[tool.poetry.dependencies]`
    Default,
    /// `[tool.poetry.dev-dependencies]` (pre 1.2 layout)
    Dev,
    /// `[tool.poetry.group.<name>.dependencies]`
    Named(String),
}

impl DependencyGroup {
    /// Returns the group name as used on the command line and by poetry
    pub fn name(&self) -> &str {
        match self {
            DependencyGroup::Default => "default",
            DependencyGroup::Dev => "dev",
            DependencyGroup::Named(name) => name,
        }
    }

    /// Returns true for the default (runtime) group
    pub fn is_default(&self) -> bool {
        matches!(self, DependencyGroup::Default)
    }
}

impl fmt::Display for DependencyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for DependencyGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// The version value of a dependency, in one of the three shapes Poetry accepts
///
/// - `foo = "^1.2"`
/// - `foo = { version = "^1.2", python = "<3.7" }`
/// - `foo = [{ version = "<1.0", python = "<3.7" }, { version = "^1.0", python = ">=3.7" }]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencyVersion {
    /// Plain version expression
    Simple(String),
    /// Record with a `version` field and auxiliary constraints
    Detailed(toml::Table),
    /// List of alternative constraint records
    Multiple(Vec<toml::Table>),
}

impl DependencyVersion {
    /// Returns the version expression, if this shape carries exactly one
    pub fn expression(&self) -> Option<&str> {
        match self {
            DependencyVersion::Simple(expr) => Some(expr),
            DependencyVersion::Detailed(table) => table.get("version").and_then(|v| v.as_str()),
            DependencyVersion::Multiple(_) => None,
        }
    }

    /// Returns a copy with the version expression replaced
    ///
    /// Sibling fields of a record keep their values and order. Returns `None`
    /// for shapes without a single version expression.
    pub fn with_expression(&self, expression: &str) -> Option<DependencyVersion> {
        match self {
            DependencyVersion::Simple(_) => Some(DependencyVersion::Simple(expression.to_string())),
            DependencyVersion::Detailed(table) => {
                if !table.contains_key("version") {
                    return None;
                }
                let mut table = table.clone();
                table.insert(
                    "version".to_string(),
                    toml::Value::String(expression.to_string()),
                );
                Some(DependencyVersion::Detailed(table))
            }
            DependencyVersion::Multiple(_) => None,
        }
    }
}

fn fmt_record(table: &toml::Table, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{{ ")?;
    for (i, (key, value)) in table.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{} = {}", key, value)?;
    }
    write!(f, " }}")
}

impl fmt::Display for DependencyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyVersion::Simple(expr) => write!(f, "{}", expr),
            DependencyVersion::Detailed(table) => fmt_record(table, f),
            DependencyVersion::Multiple(tables) => {
                write!(f, "[")?;
                for (i, table) in tables.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    fmt_record(table, f)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Represents a dependency declared in pyproject.toml
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dependency {
    /// Package name as declared in the manifest
    pub name: String,
    /// Declared version value
    pub version: DependencyVersion,
    /// Group the dependency is declared in
    pub group: DependencyGroup,
}

impl Dependency {
    /// Creates a new dependency
    pub fn new(name: impl Into<String>, version: DependencyVersion, group: DependencyGroup) -> Self {
        Self {
            name: name.into(),
            version,
            group,
        }
    }

    /// Returns the normalized package name
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Returns the constraint kind of the declared version
    pub fn constraint(&self) -> Option<ConstraintKind> {
        classify(&self.version)
    }

    /// Returns true if `name` refers to this dependency
    ///
    /// Matches the declared name exactly, or after normalizing both sides.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name || self.normalized_name() == normalize_name(name)
    }

    /// Returns a copy of this dependency with a new version value
    pub fn with_version(&self, version: DependencyVersion) -> Self {
        Self {
            name: self.name.clone(),
            version,
            group: self.group.clone(),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_default() {
            write!(f, "{} = {}", self.name, self.version)
        } else {
            write!(f, "{} = {} ({})", self.name, self.version, self.group)
        }
    }
}
