//! poetryup - Poetry dependency updater library
//!
//! Runs poetry to move the lock state forward, then bumps each declared
//! constraint in pyproject.toml to the resolved version while keeping its
//! operator and the surrounding formatting:
//! - Caret (`^1.2.3`), tilde (`~1.2` / `~=1.2`), `>=` and exact constraints are bumped
//! - Wildcards and multi-part constraints are left untouched

pub mod cli;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod package_manager;
pub mod progress;
pub mod update;
