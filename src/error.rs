//! Error types for build-configuration operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for build-configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main error type for all build-configuration operations
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Edited fields rejected before reaching a descriptor
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Directory creation, move or permission failures
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// Descriptor persistence errors
    #[error("Descriptor error: {0}")]
    Descriptor(#[from] DescriptorError),

    /// External packaging collaborator failures
    #[error("Packaging error: {0}")]
    Packaging(#[from] PackagingError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Settings file errors
    #[error("Settings error: {0}")]
    Settings(String),

    /// The session actor is gone
    #[error("Session closed")]
    SessionClosed,

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Edit-state validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Package id does not follow the dotted-identifier grammar
    #[error(
        "Invalid package id '{value}': expected at least two dot-separated segments, each starting with a letter"
    )]
    InvalidPackageId {
        /// Rejected value
        value: String,
    },

    /// A required field is empty
    #[error("Required field '{field}' is empty")]
    EmptyField {
        /// Field name as shown on the editing surface
        field: &'static str,
    },

    /// Version code is not a non-negative 32-bit integer
    #[error("Invalid version code '{value}': {reason}")]
    InvalidVersionCode {
        /// Rejected value
        value: String,
        /// Reason for the error
        reason: String,
    },
}

/// Filesystem errors raised while saving or promoting a project
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// I/O failure with the path and the operation that failed
    #[error("{context} {path}: {error}")]
    Fs {
        /// Operation being performed (e.g. "creating project directory")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// Target directory is already present
    #[error("{path} already exists")]
    AlreadyExists {
        /// Conflicting path
        path: PathBuf,
    },

    /// Source path is missing or is not a regular file
    #[error("{path} is not a file")]
    NotAFile {
        /// Offending path
        path: PathBuf,
    },

    /// Promotion requested for a project that is already directory-based
    #[error("{path} is already part of a project")]
    NotSingleFile {
        /// Script path
        path: PathBuf,
    },
}

/// Descriptor persistence errors
#[derive(Error, Debug)]
pub enum DescriptorError {
    /// Descriptor file contents could not be parsed
    #[error("Descriptor file corrupted: {reason}")]
    Corrupted {
        /// Reason for the error
        reason: String,
    },

    /// Failed to save descriptor
    #[error("Failed to save descriptor: {reason}")]
    SaveFailed {
        /// Reason for the error
        reason: String,
    },

    /// Failed to load descriptor
    #[error("Failed to load descriptor: {reason}")]
    LoadFailed {
        /// Reason for the error
        reason: String,
    },
}

/// Packaging collaborator errors
#[derive(Error, Debug, Clone)]
pub enum PackagingError {
    /// Packager executable could not be located
    #[error("Packager '{command}' not found: {reason}")]
    ToolNotFound {
        /// Command that was looked up
        command: String,
        /// Reason for the error
        reason: String,
    },

    /// Packager ran and reported failure
    #[error("Packaging failed: {reason}")]
    Failed {
        /// Message reported by the collaborator
        reason: String,
    },

    /// Packager did not finish in time
    #[error("Packaging timed out after {seconds}s")]
    TimedOut {
        /// Timeout that elapsed
        seconds: u64,
    },

    /// Packager reported success but the artifact is missing
    #[error("Packager reported artifact {path} but it does not exist")]
    MissingArtifact {
        /// Reported artifact path
        path: PathBuf,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl ConfigError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ConfigError::Validation(ValidationError::InvalidPackageId { .. }) => vec![
                "Use a reverse-domain package id such as com.example.app".to_string(),
                "Each segment must start with a letter and contain only letters, digits or '_'"
                    .to_string(),
            ],
            ConfigError::Validation(ValidationError::InvalidVersionCode { .. }) => vec![
                "Version code must be a whole number, e.g. 1 or 42".to_string(),
            ],
            ConfigError::Validation(ValidationError::EmptyField { field }) => {
                vec![format!("Fill in the '{}' field and save again", field)]
            }
            ConfigError::Filesystem(FilesystemError::AlreadyExists { path }) => vec![
                format!("Rename or remove {} before promoting", path.display()),
            ],
            ConfigError::Filesystem(FilesystemError::NotSingleFile { .. }) => vec![
                "The script already lives in a project; save it directly instead".to_string(),
            ],
            ConfigError::Packaging(PackagingError::ToolNotFound { command, .. }) => vec![
                format!("Install '{}' or put it on PATH", command),
                "Pass the full path to the packager with --packager".to_string(),
            ],
            ConfigError::Packaging(PackagingError::TimedOut { .. }) => vec![
                "Raise packager_timeout_secs in the settings file".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ConfigError::SessionClosed
                | ConfigError::Filesystem(FilesystemError::NotSingleFile { .. })
        )
    }
}

/// Extension trait for filesystem operations with automatic path context.
///
/// Wraps I/O errors with the path that caused them for better diagnostics.
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the operation,
    /// e.g., "reading file", "creating directory", "moving script".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| {
            FilesystemError::Fs {
                context,
                path: path.into(),
                error,
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_context_keeps_path() {
        let res: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let err = res.fs_context("creating project directory", "/scripts/foo").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("creating project directory"));
        assert!(message.contains("/scripts/foo"));
    }

    #[test]
    fn test_validation_errors_have_suggestions() {
        let err: ConfigError = ValidationError::InvalidPackageId {
            value: "com".into(),
        }
        .into();
        assert!(err.is_recoverable());
        assert_eq!(err.recovery_suggestions().len(), 2);
    }
}
