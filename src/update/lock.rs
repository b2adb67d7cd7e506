//! Resolved dependency listing and reconciliation
//!
//! Parses the output of `poetry show --tree` and pairs each declared
//! dependency with the version Poetry resolved for it.

use crate::domain::{normalize_name, Dependency};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// A top-level line of the resolved listing: `<name> <version> [description]`
static LISTING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._-]*)\s+(\d\S*)").expect("valid listing regex")
});

/// A package and the version Poetry resolved for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    pub name: String,
    pub version: String,
}

/// A declared dependency paired with its resolved version
#[derive(Debug, Clone, PartialEq)]
pub struct LockedDependency {
    pub dependency: Dependency,
    pub lock_version: String,
}

/// Parse the resolved listing
///
/// Tree-drawing lines (transitive dependencies) and any other line not
/// starting with a name and a version are ignored.
pub fn parse_listing(listing: &str) -> Vec<ResolvedPackage> {
    listing
        .lines()
        .filter_map(|line| {
            let captures = LISTING_LINE.captures(line)?;
            Some(ResolvedPackage {
                name: captures[1].to_string(),
                version: captures[2].to_string(),
            })
        })
        .collect()
}

/// Pair declared dependencies with their resolved versions
///
/// A resolved entry matches when its name equals the declared name or both
/// normalize to the same name. Dependencies without a match are dropped.
pub fn reconcile(declared: &[Dependency], listing: &[ResolvedPackage]) -> Vec<LockedDependency> {
    declared
        .iter()
        .filter_map(|dependency| {
            let wanted = dependency.normalized_name();
            let resolved = listing
                .iter()
                .find(|p| p.name == dependency.name || normalize_name(&p.name) == wanted);

            match resolved {
                Some(package) => {
                    debug!("{} resolved to {}", dependency.name, package.version);
                    Some(LockedDependency {
                        dependency: dependency.clone(),
                        lock_version: package.version.clone(),
                    })
                }
                None => {
                    warn!(
                        "Dependency '{}' not found in resolved dependencies",
                        dependency.name
                    );
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyGroup, DependencyVersion};

    const LISTING: &str = "\
poetryup 0.2.0 Update dependencies and bump their version in the pyproject.toml file
├── packaging >=21.3,<22.0
│   └── pyparsing >=2.0.2,<3.0.5 || >3.0.5
└── tomlkit >=0.7.2,<0.8.0
PoetryUp_Extra 0.3.1 Extra helpers
requests 2.31.0 Python HTTP for Humans.
└── charset-normalizer >=2,<4
";

    fn dep(name: &str, version: &str) -> Dependency {
        Dependency::new(
            name,
            DependencyVersion::Simple(version.to_string()),
            DependencyGroup::Default,
        )
    }

    #[test]
    fn test_parse_listing() {
        let packages = parse_listing(LISTING);
        assert_eq!(
            packages,
            vec![
                ResolvedPackage {
                    name: "poetryup".to_string(),
                    version: "0.2.0".to_string()
                },
                ResolvedPackage {
                    name: "PoetryUp_Extra".to_string(),
                    version: "0.3.1".to_string()
                },
                ResolvedPackage {
                    name: "requests".to_string(),
                    version: "2.31.0".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_parse_listing_ignores_noise() {
        let listing = "\nWarning: poetry.lock is not consistent\n   \n(!) broken 1.0\nzope.interface 6.0 Interfaces\n";
        let packages = parse_listing(listing);
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "zope.interface");
        assert_eq!(packages[0].version, "6.0");
    }

    #[test]
    fn test_parse_listing_empty() {
        assert!(parse_listing("").is_empty());
    }

    #[test]
    fn test_reconcile_exact_name() {
        let locked = reconcile(&[dep("requests", "^2.0")], &parse_listing(LISTING));
        assert_eq!(locked.len(), 1);
        assert_eq!(locked[0].lock_version, "2.31.0");
        assert_eq!(locked[0].dependency.name, "requests");
    }

    #[test]
    fn test_reconcile_normalized_name() {
        let listing = parse_listing("poetryup-extra 0.2.0 extras\n");
        let locked = reconcile(&[dep("PoetryUp_Extra", "^0.1.0")], &listing);
        assert_eq!(locked.len(), 1);
        assert_eq!(locked[0].dependency.name, "PoetryUp_Extra");
        assert_eq!(locked[0].lock_version, "0.2.0");
    }

    #[test]
    fn test_reconcile_normalizes_listing_side() {
        let locked = reconcile(&[dep("poetryup-extra", "^0.1.0")], &parse_listing(LISTING));
        assert_eq!(locked.len(), 1);
        assert_eq!(locked[0].lock_version, "0.3.1");
    }

    #[test]
    fn test_reconcile_drops_unmatched() {
        let declared = vec![dep("poetryup", "^0.1.0"), dep("django", "^4.0")];
        let locked = reconcile(&declared, &parse_listing(LISTING));
        assert_eq!(locked.len(), 1);
        assert_eq!(locked[0].dependency.name, "poetryup");
    }

    #[test]
    fn test_reconcile_ignores_transitive_entries() {
        let locked = reconcile(&[dep("packaging", "^21.0")], &parse_listing(LISTING));
        assert!(locked.is_empty());
    }

    #[test]
    fn test_reconcile_keeps_group_and_shape() {
        let mut record = toml::Table::new();
        record.insert("version".to_string(), toml::Value::String("^0.1.0".to_string()));
        record.insert("python".to_string(), toml::Value::String("<3.7".to_string()));
        let declared = Dependency::new(
            "poetryup",
            DependencyVersion::Detailed(record),
            DependencyGroup::Named("docs".to_string()),
        );

        let locked = reconcile(std::slice::from_ref(&declared), &parse_listing(LISTING));
        assert_eq!(locked[0].dependency, declared);
    }
}
