//! Format-preserving access to Poetry's pyproject.toml
//!
//! Handles:
//! - tool.poetry.dependencies
//! - tool.poetry.dev-dependencies (pre 1.2 layout)
//! - tool.poetry.group.<name>.dependencies (Poetry 1.2+)
//!
//! The document is kept as a `toml_edit::DocumentMut`, so comments,
//! whitespace and key order survive a load/dump cycle. Writes replace a
//! single string value and keep its decoration.

use crate::domain::{normalize_name, Dependency, DependencyGroup, DependencyVersion};
use crate::error::ManifestError;
use std::path::{Path, PathBuf};
use toml_edit::{DocumentMut, Item, TableLike, Value};
use tracing::{debug, warn};

/// Entry of the default group that pins the interpreter, not a package
const PYTHON_ENTRY: &str = "python";

/// A loaded pyproject.toml
#[derive(Debug, Clone)]
pub struct Pyproject {
    path: PathBuf,
    doc: DocumentMut,
}

impl Pyproject {
    /// Parse manifest content
    ///
    /// Fails if the content is not valid TOML or has no `[tool.poetry]` table.
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self, ManifestError> {
        let path = path.into();
        let doc: DocumentMut = content
            .parse()
            .map_err(|e: toml_edit::TomlError| ManifestError::toml_parse_error(&path, e.to_string()))?;

        let has_poetry = doc
            .get("tool")
            .and_then(|tool| tool.get("poetry"))
            .and_then(Item::as_table_like)
            .is_some();
        if !has_poetry {
            return Err(ManifestError::missing_poetry_section(&path));
        }

        Ok(Self { path, doc })
    }

    /// Path the manifest was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize the document back to text
    pub fn dump(&self) -> String {
        self.doc.to_string()
    }

    /// List declared dependencies
    ///
    /// Order: default group (without the `python` entry), legacy
    /// dev-dependencies, then each `group.<name>` in document order.
    pub fn dependencies(&self) -> Vec<Dependency> {
        let mut dependencies = Vec::new();

        if let Some(table) = self.dependency_table(&DependencyGroup::Default) {
            collect_dependencies(table, &DependencyGroup::Default, &mut dependencies);
        }

        if let Some(table) = self.dependency_table(&DependencyGroup::Dev) {
            collect_dependencies(table, &DependencyGroup::Dev, &mut dependencies);
        }

        if let Some(groups) = self.poetry().and_then(|p| p.get("group")).and_then(Item::as_table_like)
        {
            for (group_name, _) in groups.iter() {
                let group = DependencyGroup::Named(group_name.to_string());
                if let Some(table) = self.dependency_table(&group) {
                    collect_dependencies(table, &group, &mut dependencies);
                }
            }
        }

        dependencies
    }

    /// Write a dependency's version value into its slot
    ///
    /// Only an existing entry is rewritten; returns false if the group or the
    /// entry does not exist, or its shape no longer matches.
    pub fn set_version(&mut self, dependency: &Dependency) -> bool {
        let Some(table) = self.dependency_table_mut(&dependency.group) else {
            return false;
        };
        let Some(key) = find_key(table, &dependency.name) else {
            return false;
        };
        let Some(item) = table.get_mut(&key) else {
            return false;
        };

        let written = write_version(item, &dependency.version);
        if written {
            debug!(
                "Set {} ({}) to {}",
                key, dependency.group, dependency.version
            );
        }
        written
    }

    fn poetry(&self) -> Option<&Item> {
        self.doc.get("tool")?.get("poetry")
    }

    fn dependency_table(&self, group: &DependencyGroup) -> Option<&dyn TableLike> {
        let poetry = self.poetry()?;
        let item = match group {
            DependencyGroup::Default => poetry.get("dependencies")?,
            DependencyGroup::Dev => poetry.get("dev-dependencies")?,
            DependencyGroup::Named(name) => poetry
                .get("group")?
                .get(name.as_str())?
                .get("dependencies")?,
        };
        item.as_table_like()
    }

    /// Mutable counterpart of `dependency_table`
    ///
    /// Walks table by table; `Item::get_mut` would insert missing keys.
    fn dependency_table_mut(&mut self, group: &DependencyGroup) -> Option<&mut dyn TableLike> {
        let tool = self.doc.as_table_mut().get_mut("tool")?;
        let poetry = child_table_mut(tool.as_table_like_mut()?, "poetry")?;
        match group {
            DependencyGroup::Default => child_table_mut(poetry, "dependencies"),
            DependencyGroup::Dev => child_table_mut(poetry, "dev-dependencies"),
            DependencyGroup::Named(name) => {
                let groups = child_table_mut(poetry, "group")?;
                let group = child_table_mut(groups, name)?;
                child_table_mut(group, "dependencies")
            }
        }
    }
}

/// Existing sub-table `key` of `table`, never inserted
fn child_table_mut<'a>(table: &'a mut dyn TableLike, key: &str) -> Option<&'a mut dyn TableLike> {
    table.get_mut(key)?.as_table_like_mut()
}

fn collect_dependencies(
    table: &dyn TableLike,
    group: &DependencyGroup,
    dependencies: &mut Vec<Dependency>,
) {
    for (name, item) in table.iter() {
        if group.is_default() && name.eq_ignore_ascii_case(PYTHON_ENTRY) {
            continue;
        }
        match version_from_item(item) {
            Some(version) => dependencies.push(Dependency::new(name, version, group.clone())),
            None => warn!("Ignoring dependency '{}' ({}): unsupported value", name, group),
        }
    }
}

/// Find the key for `name`: exact match first, then normalized match
fn find_key(table: &dyn TableLike, name: &str) -> Option<String> {
    if table.contains_key(name) {
        return Some(name.to_string());
    }
    let wanted = normalize_name(name);
    table
        .iter()
        .map(|(key, _)| key)
        .find(|key| normalize_name(key) == wanted)
        .map(str::to_string)
}

fn version_from_item(item: &Item) -> Option<DependencyVersion> {
    match item {
        Item::Value(Value::String(s)) => Some(DependencyVersion::Simple(s.value().to_string())),
        Item::Value(Value::InlineTable(table)) => {
            record_from_table(table).map(DependencyVersion::Detailed)
        }
        Item::Table(table) => record_from_table(table).map(DependencyVersion::Detailed),
        Item::Value(Value::Array(array)) => array
            .iter()
            .map(|value| value.as_inline_table().and_then(|t| record_from_table(t)))
            .collect::<Option<Vec<_>>>()
            .map(DependencyVersion::Multiple),
        Item::ArrayOfTables(array) => array
            .iter()
            .map(|t| record_from_table(t))
            .collect::<Option<Vec<_>>>()
            .map(DependencyVersion::Multiple),
        _ => None,
    }
}

/// Detach a table from the document into a plain `toml::Table`
fn record_from_table(table: &dyn TableLike) -> Option<toml::Table> {
    let mut record = toml::Table::new();
    for (key, item) in table.iter() {
        let value = match item {
            Item::Value(value) => detach_value(value)?,
            Item::Table(nested) => toml::Value::Table(record_from_table(nested)?),
            _ => return None,
        };
        record.insert(key.to_string(), value);
    }
    Some(record)
}

fn detach_value(value: &Value) -> Option<toml::Value> {
    let mut holder: toml::Table = toml::from_str(&format!("v = {}", value)).ok()?;
    holder.remove("v")
}

fn write_version(item: &mut Item, version: &DependencyVersion) -> bool {
    match version {
        DependencyVersion::Simple(expression) => match item {
            Item::Value(value @ Value::String(_)) => {
                replace_string(value, expression);
                true
            }
            _ => false,
        },
        DependencyVersion::Detailed(record) => {
            let Some(expression) = record.get("version").and_then(|v| v.as_str()) else {
                return false;
            };
            let Some(table) = item.as_table_like_mut() else {
                return false;
            };
            match table.get_mut("version") {
                Some(Item::Value(value @ Value::String(_))) => {
                    replace_string(value, expression);
                    true
                }
                _ => false,
            }
        }
        DependencyVersion::Multiple(_) => false,
    }
}

/// Replace a string value, keeping the whitespace and comments around it
fn replace_string(value: &mut Value, new_value: &str) {
    let decor = value.decor().clone();
    *value = Value::from(new_value);
    *value.decor_mut() = decor;
}
