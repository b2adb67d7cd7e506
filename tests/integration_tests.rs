//! Integration tests for poetryup
//!
//! These tests verify:
//! - Full update runs against a scripted package manager
//! - Format preservation of the rewritten pyproject.toml
//! - Command selection across poetry versions
//! - CLI filters flowing into the run

use clap::Parser;
use poetryup::cli::CliArgs;
use poetryup::domain::{DependencyGroup, SkipReason, UpdateResult};
use poetryup::error::{AppError, CommandError};
use poetryup::orchestrator::{Orchestrator, OrchestratorError, RunOptions};
use poetryup::package_manager::{add_args, lock_args, PackageManager};
use poetryup::update::UpdateFilter;
use semver::Version;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PYPROJECT: &str = r#"[tool.poetry]
name = "demo"
version = "0.1.0"
description = ""

[tool.poetry.dependencies]
python = "^3.8"
poetryup = "^0.1.0"
requests = { version = "~2.25.0", extras = ["socks"] }
packaging = "~=21.0"
httpx = ">=0.23.0"
attrs = "22.1.0"  # exact
colorama = "*"
urllib3 = ">=1.26,<2"
Typing_Extensions = "^4.0.0"
certifi = "<2024"
numpy = [
    { version = "^1.24", python = ">=3.9" },
    { version = "^1.21", python = "<3.9" },
]

[tool.poetry.group.dev.dependencies]
pytest = "^7.0"

[build-system]
requires = ["poetry-core"]
build-backend = "poetry.core.masonry.api"
"#;

const LISTING: &str = "\
attrs 23.1.0 Classes Without Boilerplate
certifi 2023.7.22 Python package for providing Mozilla's CA Bundle.
colorama 0.4.6 Cross-platform colored terminal text.
httpx 0.24.1 The next generation HTTP client.
numpy 1.25.2 Fundamental package for array computing in Python
packaging 23.1 Core utilities for Python packages
poetryup 0.2.0 Update dependencies and bump their version in the pyproject.toml file
pytest 7.4.0 pytest: simple powerful testing with Python
├── colorama *
└── packaging *
requests 2.31.0 Python HTTP for Humans.
├── certifi >=2017.4.17
└── urllib3 >=1.21.1,<3
typing-extensions 4.7.1 Backported and Experimental Type Hints for Python 3.7+
urllib3 1.26.16 HTTP library with thread-safe connection pooling
";

/// Scripted package manager recording every command it is asked to run
struct ScriptedPoetry {
    version: Version,
    listing: String,
    fail_with: Option<(&'static str, i32)>,
    rewrite_on_add: Option<(PathBuf, String)>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedPoetry {
    fn new(version: &str) -> Self {
        Self {
            version: Version::parse(version).unwrap(),
            listing: LISTING.to_string(),
            fail_with: None,
            rewrite_on_add: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Overwrite `path` with `content` whenever `add` runs, as poetry does
    fn rewriting_on_add(mut self, path: &Path, content: &str) -> Self {
        self.rewrite_on_add = Some((path.to_path_buf(), content.to_string()));
        self
    }

    fn failing(mut self, operation: &'static str, code: i32) -> Self {
        self.fail_with = Some((operation, code));
        self
    }

    fn run(&self, args: Vec<String>) -> Result<(), CommandError> {
        let command = args.join(" ");
        self.calls.borrow_mut().push(command.clone());
        match self.fail_with {
            Some((operation, code)) if args[0] == operation => Err(CommandError::failed(
                format!("poetry {}", command),
                Some(code),
                "resolver failed",
            )),
            _ => Ok(()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl PackageManager for ScriptedPoetry {
    fn version(&self) -> &Version {
        &self.version
    }

    fn update(&self) -> Result<(), CommandError> {
        self.run(vec!["update".to_string()])
    }

    fn show_tree(&self) -> Result<String, CommandError> {
        self.run(vec!["show".to_string(), "--tree".to_string()])?;
        Ok(self.listing.clone())
    }

    fn add_latest(
        &self,
        packages: &[String],
        group: &DependencyGroup,
    ) -> Result<bool, CommandError> {
        if packages.is_empty() {
            return Ok(true);
        }
        match add_args(&self.version, packages, group) {
            Some(args) => {
                self.run(args)?;
                if let Some((path, content)) = &self.rewrite_on_add {
                    fs::write(path, content).unwrap();
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn lock(&self) -> Result<(), CommandError> {
        self.run(lock_args(&self.version))
    }
}

fn setup(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("pyproject.toml");
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

fn options(latest: bool, dry_run: bool) -> RunOptions {
    RunOptions {
        latest,
        dry_run,
        lock: true,
        show_progress: false,
    }
}

fn bumped_pyproject() -> String {
    PYPROJECT
        .replace(r#"poetryup = "^0.1.0""#, r#"poetryup = "^0.2.0""#)
        .replace(r#"version = "~2.25.0""#, r#"version = "~2.31.0""#)
        .replace(r#"packaging = "~=21.0""#, r#"packaging = "~=23.1""#)
        .replace(r#"httpx = ">=0.23.0""#, r#"httpx = ">=0.24.1""#)
        .replace(r#"attrs = "22.1.0""#, r#"attrs = "23.1.0""#)
        .replace(
            r#"Typing_Extensions = "^4.0.0""#,
            r#"Typing_Extensions = "^4.7.1""#,
        )
        .replace(r#"pytest = "^7.0""#, r#"pytest = "^7.4.0""#)
}

mod update_mode {
    use super::*;

    /// Every bumpable constraint keeps its operator; everything else is untouched
    #[test]
    fn test_update_bumps_and_preserves_format() {
        let (_dir, path) = setup(PYPROJECT);
        let poetry = ScriptedPoetry::new("1.8.2");

        let result = Orchestrator::new(options(false, false), UpdateFilter::new())
            .run(&path, &poetry)
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), bumped_pyproject());
        assert_eq!(result.original, PYPROJECT);
        assert_eq!(result.updated, bumped_pyproject());
        assert!(result.written);
        assert!(result.lock_refreshed);
        assert!(result.errors.is_empty());
        assert_eq!(
            poetry.calls(),
            vec!["update", "show --tree", "lock --no-update"]
        );
    }

    #[test]
    fn test_update_results_cover_every_dependency() {
        let (_dir, path) = setup(PYPROJECT);
        let poetry = ScriptedPoetry::new("1.8.2");

        let result = Orchestrator::new(options(false, false), UpdateFilter::new())
            .run(&path, &poetry)
            .unwrap();

        // python is not a dependency of its own
        assert_eq!(result.manifest.results.len(), 11);
        assert_eq!(result.total_updates(), 7);

        let reason_of = |name: &str| {
            result
                .manifest
                .results
                .iter()
                .find_map(|r| match r {
                    UpdateResult::Skip { dependency, reason } if dependency.name == name => {
                        Some(reason.clone())
                    }
                    _ => None,
                })
                .unwrap()
        };

        assert!(matches!(
            reason_of("colorama"),
            SkipReason::NonBumpableConstraint(_)
        ));
        assert!(matches!(
            reason_of("urllib3"),
            SkipReason::NonBumpableConstraint(_)
        ));
        assert!(matches!(
            reason_of("numpy"),
            SkipReason::NonBumpableConstraint(_)
        ));
        assert_eq!(
            reason_of("certifi"),
            SkipReason::UnsupportedInequality("<".to_string())
        );
    }

    /// Running twice against the same lock state changes nothing the second time
    #[test]
    fn test_update_is_idempotent() {
        let (_dir, path) = setup(PYPROJECT);
        let orchestrator = Orchestrator::new(options(false, false), UpdateFilter::new());

        orchestrator
            .run(&path, &ScriptedPoetry::new("1.8.2"))
            .unwrap();
        let poetry = ScriptedPoetry::new("1.8.2");
        let second = orchestrator.run(&path, &poetry).unwrap();

        assert_eq!(second.total_updates(), 0);
        assert!(!second.written);
        assert_eq!(poetry.calls(), vec!["update", "show --tree"]);
        assert_eq!(fs::read_to_string(&path).unwrap(), bumped_pyproject());
    }

    #[test]
    fn test_update_with_poetry_2_locks_without_flag() {
        let (_dir, path) = setup(PYPROJECT);
        let poetry = ScriptedPoetry::new("2.1.3");

        Orchestrator::new(options(false, false), UpdateFilter::new())
            .run(&path, &poetry)
            .unwrap();

        assert_eq!(poetry.calls(), vec!["update", "show --tree", "lock"]);
    }

    #[test]
    fn test_dry_run_reports_without_writing() {
        let (_dir, path) = setup(PYPROJECT);
        let poetry = ScriptedPoetry::new("1.8.2");

        let result = Orchestrator::new(options(false, true), UpdateFilter::new())
            .run(&path, &poetry)
            .unwrap();

        assert_eq!(result.total_updates(), 7);
        assert!(result.dry_run);
        assert!(!result.written);
        assert!(!result.lock_refreshed);
        assert_eq!(result.updated, bumped_pyproject());
        assert_eq!(fs::read_to_string(&path).unwrap(), PYPROJECT);
        assert_eq!(poetry.calls(), vec!["show --tree"]);
    }

    #[test]
    fn test_failed_update_aborts_with_its_exit_code() {
        let (_dir, path) = setup(PYPROJECT);
        let poetry = ScriptedPoetry::new("1.8.2").failing("update", 3);

        let err = Orchestrator::new(options(false, false), UpdateFilter::new())
            .run(&path, &poetry)
            .unwrap_err();

        assert_eq!(err.exit_code(), 3);
        assert!(matches!(err, AppError::Command(CommandError::Failed { .. })));
        assert_eq!(poetry.calls(), vec!["update"]);
        assert_eq!(fs::read_to_string(&path).unwrap(), PYPROJECT);
    }

    #[test]
    fn test_failed_lock_after_write() {
        let (_dir, path) = setup(PYPROJECT);
        let poetry = ScriptedPoetry::new("1.8.2").failing("lock", 1);

        let err = Orchestrator::new(options(false, false), UpdateFilter::new())
            .run(&path, &poetry)
            .unwrap_err();

        assert_eq!(err.exit_code(), 1);
        // The manifest was already written when the lock refresh failed
        assert_eq!(fs::read_to_string(&path).unwrap(), bumped_pyproject());
    }
}

mod latest_mode {
    use super::*;

    const LEGACY_PYPROJECT: &str = r#"[tool.poetry]
name = "demo"

[tool.poetry.dependencies]
python = "^3.8"
poetryup = "^0.1.0"
requests = { version = "^2.25.0", extras = ["socks"] }

[tool.poetry.dev-dependencies]
pytest = "^7.0"

[tool.poetry.group.docs.dependencies]
sphinx = "^4.0.0"
"#;

    #[test]
    fn test_latest_requests_plain_strings_per_group() {
        let (_dir, path) = setup(LEGACY_PYPROJECT);
        let poetry = ScriptedPoetry::new("1.8.2");

        let result = Orchestrator::new(options(true, false), UpdateFilter::new())
            .run(&path, &poetry)
            .unwrap();

        assert_eq!(
            poetry.calls(),
            vec![
                "add poetryup@latest",
                "add pytest@latest --group dev",
                "add sphinx@latest --group docs",
                "show --tree",
                "lock --no-update",
            ]
        );
        assert!(result.written);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_latest_with_legacy_poetry() {
        let (_dir, path) = setup(LEGACY_PYPROJECT);
        let poetry = ScriptedPoetry::new("1.1.13");

        let result = Orchestrator::new(options(true, false), UpdateFilter::new())
            .run(&path, &poetry)
            .unwrap();

        assert_eq!(
            poetry.calls(),
            vec![
                "add poetryup@latest",
                "add pytest@latest --dev",
                "show --tree",
                "lock --no-update",
            ]
        );
        assert_eq!(
            result.errors,
            vec![OrchestratorError::UnsupportedGroup {
                group: "docs".to_string(),
                packages: vec!["sphinx".to_string()],
            }]
        );

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains(r#"poetryup = "^0.2.0""#));
        assert!(content.contains(r#"requests = { version = "^2.31.0", extras = ["socks"] }"#));
        assert!(content.contains(r#"pytest = "^7.4.0""#));
        assert!(content.contains(r#"sphinx = "^4.0.0""#));
    }

    /// Poetry rewrites constraints itself during `add`; the loaded document wins
    #[test]
    fn test_latest_restores_operators_rewritten_by_add() {
        let (_dir, path) = setup(PYPROJECT);
        let rewritten = PYPROJECT
            .replace(r#"colorama = "*""#, r#"colorama = "^0.4.6""#)
            .replace(r#"poetryup = "^0.1.0""#, r#"poetryup = "^0.2.0""#);
        let poetry = ScriptedPoetry::new("1.8.2").rewriting_on_add(&path, &rewritten);

        let result = Orchestrator::new(options(true, false), UpdateFilter::new())
            .run(&path, &poetry)
            .unwrap();

        assert!(result.written);
        assert_eq!(fs::read_to_string(&path).unwrap(), bumped_pyproject());
    }
}

mod cli_filters {
    use super::*;

    fn orchestrator_for(args: &[&str]) -> Orchestrator {
        let mut full = vec!["poetryup"];
        full.extend_from_slice(args);
        Orchestrator::from_cli(&CliArgs::parse_from(full))
    }

    fn updated_names(args: &[&str]) -> Vec<String> {
        let (_dir, path) = setup(PYPROJECT);
        let result = orchestrator_for(args)
            .run(&path, &ScriptedPoetry::new("1.8.2"))
            .unwrap();
        result
            .manifest
            .updates()
            .map(|r| r.package_name().to_string())
            .collect()
    }

    #[test]
    fn test_name_filter() {
        assert_eq!(
            updated_names(&["--name", "poetryup", "--name", "typing-extensions"]),
            vec!["poetryup", "Typing_Extensions"]
        );
    }

    #[test]
    fn test_exclude_name_wins() {
        assert_eq!(
            updated_names(&[
                "--name",
                "poetryup",
                "--name",
                "httpx",
                "--exclude-name",
                "httpx"
            ]),
            vec!["poetryup"]
        );
    }

    #[test]
    fn test_group_filter() {
        assert_eq!(updated_names(&["--group", "dev"]), vec!["pytest"]);
    }

    #[test]
    fn test_skip_exact_and_without_constraint() {
        let names = updated_names(&[
            "--skip-exact",
            "--without-constraint",
            "caret",
            "--without-constraint",
            "tilde",
        ]);
        assert_eq!(names, vec!["httpx"]);
    }

    #[test]
    fn test_no_lock() {
        let (_dir, path) = setup(PYPROJECT);
        let poetry = ScriptedPoetry::new("1.8.2");
        let result = orchestrator_for(&["--no-lock"]).run(&path, &poetry).unwrap();

        assert!(result.written);
        assert!(!result.lock_refreshed);
        assert_eq!(poetry.calls(), vec!["update", "show --tree"]);
    }
}

mod manifest_errors {
    use super::*;

    #[test]
    fn test_missing_poetry_section() {
        let (_dir, path) = setup("[project]\nname = \"demo\"\n");
        let poetry = ScriptedPoetry::new("1.8.2");

        let err = Orchestrator::new(options(false, false), UpdateFilter::new())
            .run(&path, &poetry)
            .unwrap_err();

        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("[tool.poetry]"));
        assert!(poetry.calls().is_empty());
    }

    #[test]
    fn test_invalid_toml() {
        let (_dir, path) = setup("[tool.poetry\nname = ");
        let poetry = ScriptedPoetry::new("1.8.2");

        let err = Orchestrator::new(options(false, false), UpdateFilter::new())
            .run(&path, &poetry)
            .unwrap_err();

        assert_eq!(err.exit_code(), 1);
        assert!(poetry.calls().is_empty());
    }
}
