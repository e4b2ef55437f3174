//! Error types for the skeleton CLI.
//!
//! This module defines the `SkeletonError` enum which covers every failure the
//! scaffolding flow can report. Command plumbing uses `anyhow::Result`; these
//! typed errors are carried inside it so the top level can pick an exit code
//! and attach a hint about what was left on disk.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::project::InstallStage;

/// Exit code used for every error kind.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Consolidated error type for skeleton CLI operations.
#[derive(Debug, Error)]
pub enum SkeletonError {
    /// The invocation does not match `skeleton new <name>`.
    #[error("invalid usage: {message}")]
    Usage {
        /// Description of what was wrong with the invocation.
        message: String,
    },

    /// The target path was already present before any write happened.
    #[error("'{}' already exists. Choose a different name or delete the existing path.", .path.display())]
    TargetExists {
        /// The path that already exists.
        path: PathBuf,
    },

    /// Reading the template or writing the target failed.
    #[error("{message}: {}", .path.display())]
    FileSystem {
        /// The offending template or target path.
        path: PathBuf,
        /// Description of the operation that failed.
        message: String,
        /// The underlying I/O error, if any.
        #[source]
        source: Option<std::io::Error>,
        /// Whether the target already holds entries from this run.
        left_in_place: bool,
    },

    /// A dependency installer stage failed to spawn or exited non-zero.
    #[error("{stage} dependency installation failed: {reason}")]
    Install {
        /// The stage that failed.
        stage: InstallStage,
        /// Why the stage failed.
        reason: String,
        /// The spawn error, if the installer never ran.
        #[source]
        source: Option<std::io::Error>,
    },
}

impl SkeletonError {
    /// Creates a new `Usage` error.
    #[must_use]
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Creates a new `TargetExists` error.
    #[must_use]
    pub fn target_exists(path: impl Into<PathBuf>) -> Self {
        Self::TargetExists { path: path.into() }
    }

    /// Creates a new `FileSystem` error from an I/O error.
    #[must_use]
    pub fn file_system(path: &Path, message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.to_path_buf(),
            message: message.into(),
            source: Some(source),
            left_in_place: true,
        }
    }

    /// Creates a new `FileSystem` error that has no underlying I/O error.
    #[must_use]
    pub fn file_system_without_source(path: &Path, message: impl Into<String>) -> Self {
        Self::FileSystem {
            path: path.to_path_buf(),
            message: message.into(),
            source: None,
            left_in_place: true,
        }
    }

    /// Marks a `FileSystem` error as raised before the target was written.
    #[must_use]
    pub fn nothing_written(self) -> Self {
        match self {
            Self::FileSystem {
                path,
                message,
                source,
                ..
            } => Self::FileSystem {
                path,
                message,
                source,
                left_in_place: false,
            },
            other => other,
        }
    }

    /// Creates a new `Install` error for a stage that ran and failed.
    #[must_use]
    pub fn install(stage: InstallStage, reason: impl Into<String>) -> Self {
        Self::Install {
            stage,
            reason: reason.into(),
            source: None,
        }
    }

    /// Creates a new `Install` error for a stage whose installer never started.
    #[must_use]
    pub fn install_spawn(
        stage: InstallStage,
        reason: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self::Install {
            stage,
            reason: reason.into(),
            source: Some(source),
        }
    }

    /// Returns the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        FAILURE_EXIT_CODE
    }

    /// Returns a follow-up hint to print after the error, if any.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Usage { .. } => Some("Usage: skeleton new <name>".to_string()),
            Self::TargetExists { .. } => None,
            Self::FileSystem {
                left_in_place: false,
                ..
            } => None,
            Self::FileSystem { .. } => Some(
                "Anything written before the failure was left in place; \
                 delete the partially created directory before retrying."
                    .to_string(),
            ),
            Self::Install { stage, .. } => Some(format!(
                "The project files were created. Install the remaining dependencies \
                 manually, starting with '{stage}'."
            )),
        }
    }
}
