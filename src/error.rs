//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues with reading, parsing or writing pyproject.toml
//! - CommandError: Issues running the poetry executable
//! - ConfigError: Issues with CLI configuration

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Package manager command errors
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Returns the process exit code this error should map to
    ///
    /// A failed poetry command propagates its own exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Command(CommandError::Failed {
                code: Some(code), ..
            }) if *code != 0 => *code,
            _ => 1,
        }
    }
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("couldn't find a pyproject.toml file in {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("failed to parse TOML in {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },

    /// No [tool.poetry] table in the manifest
    #[error("{path} has no [tool.poetry] section")]
    MissingPoetrySection { path: PathBuf },
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new TomlParseError
    pub fn toml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::TomlParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new MissingPoetrySection error
    pub fn missing_poetry_section(path: impl Into<PathBuf>) -> Self {
        ManifestError::MissingPoetrySection { path: path.into() }
    }
}

fn describe_failure(command: &str, code: Option<i32>, output: &str) -> String {
    let code = code
        .map(|c| c.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let output = output.trim_end();
    if output.is_empty() {
        format!("'{}' failed with exit code {}", command, code)
    } else {
        format!("'{}' failed with exit code {}:\n{}", command, code, output)
    }
}

/// Errors related to running package manager commands
#[derive(Error, Debug)]
pub enum CommandError {
    /// The executable could not be started
    #[error("failed to run '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command exited unsuccessfully
    #[error("{}", describe_failure(command, *code, output))]
    Failed {
        command: String,
        code: Option<i32>,
        output: String,
    },

    /// `poetry --version` printed something unexpected
    #[error("couldn't determine poetry version from '{output}'")]
    VersionParse { output: String },
}

impl CommandError {
    /// Creates a new SpawnFailed error
    pub fn spawn_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        CommandError::SpawnFailed {
            command: command.into(),
            source,
        }
    }

    /// Creates a new Failed error
    pub fn failed(command: impl Into<String>, code: Option<i32>, output: impl Into<String>) -> Self {
        CommandError::Failed {
            command: command.into(),
            code,
            output: output.into(),
        }
    }

    /// Creates a new VersionParse error
    pub fn version_parse(output: impl Into<String>) -> Self {
        CommandError::VersionParse {
            output: output.into(),
        }
    }
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Unknown constraint kind given to --without-constraint
    #[error("invalid constraint kind '{value}': expected one of caret, tilde, wildcard, inequality, exact, multiple-requirements, multiple-constraints")]
    InvalidConstraintKind { value: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}
