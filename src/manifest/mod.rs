//! Manifest file location, parsing and writing
//!
//! This module provides functionality to:
//! - Locate the pyproject.toml of a project directory
//! - Load it into a format-preserving document
//! - Write bumped versions back

mod pyproject;
mod writer;

pub use pyproject::Pyproject;
pub use writer::{read_manifest, write_manifest, ManifestWriter, WriteResult};

use crate::error::ManifestError;
use std::path::{Path, PathBuf};

/// Manifest file name Poetry projects use
pub const MANIFEST_FILENAME: &str = "pyproject.toml";

/// Locate the manifest of a project directory
///
/// `path` may also point at the manifest file itself.
pub fn locate_manifest(path: &Path) -> Result<PathBuf, ManifestError> {
    let manifest = if path.is_file() {
        path.to_path_buf()
    } else {
        path.join(MANIFEST_FILENAME)
    };

    if manifest.is_file() {
        Ok(manifest)
    } else {
        Err(ManifestError::not_found(path))
    }
}

/// Read and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Pyproject, ManifestError> {
    let content = read_manifest(path)?;
    Pyproject::parse(path, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_locate_manifest_in_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(MANIFEST_FILENAME);
        std::fs::write(&path, "[tool.poetry]\n").unwrap();

        assert_eq!(locate_manifest(temp_dir.path()).unwrap(), path);
    }

    #[test]
    fn test_locate_manifest_file_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(MANIFEST_FILENAME);
        std::fs::write(&path, "[tool.poetry]\n").unwrap();

        assert_eq!(locate_manifest(&path).unwrap(), path);
    }

    #[test]
    fn test_locate_manifest_missing() {
        let temp_dir = TempDir::new().unwrap();
        let err = locate_manifest(temp_dir.path()).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { .. }));
    }

    #[test]
    fn test_load_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(MANIFEST_FILENAME);
        std::fs::write(
            &path,
            "[tool.poetry]\nname = \"x\"\n\n[tool.poetry.dependencies]\nrequests = \"^2.0\"\n",
        )
        .unwrap();

        let document = load_manifest(&path).unwrap();
        assert_eq!(document.path(), path.as_path());
        assert_eq!(document.dependencies().len(), 1);
    }
}
