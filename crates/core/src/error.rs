//! Error types for Flyway CLI acquisition and execution.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for Flyway operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while acquiring or invoking a Flyway CLI.
///
/// "Not found" is not an error: acquisition strategies signal it with
/// `Ok(None)` so that a chain can advance to its fallback. Likewise a
/// Flyway run that completes with a non-zero exit is reported through
/// [`crate::RawExecutionResponse`], never through this enum.
#[derive(Error, Debug)]
pub enum Error {
    /// A directory holds an installed CLI, but of the wrong version.
    #[error(
        "{} is a Flyway CLI directory, but its version is {found} whereas the requested version is {requested}",
        directory.display()
    )]
    VersionMismatch {
        /// The probed directory.
        directory: PathBuf,
        /// The version installed there.
        found: String,
        /// The version that was asked for.
        requested: String,
    },

    /// A directory tree holds installed CLIs, none of the requested version.
    #[error(
        "no child directory of {} is a Flyway CLI with version {requested}; only found versions: {}",
        directory.display(),
        found.join(", ")
    )]
    NoMatchingVersion {
        /// The searched root directory.
        directory: PathBuf,
        /// The version that was asked for.
        requested: String,
        /// The versions that were found instead.
        found: Vec<String>,
    },

    /// A directory that was expected to be an installed CLI is not one.
    #[error("{} is not a Flyway CLI directory", .0.display())]
    NotAnInstalledCli(PathBuf),

    /// No strategy could supply the requested CLI version.
    #[error("unable to obtain a Flyway CLI with version {requested}")]
    CliUnavailable {
        /// The version that was asked for.
        requested: String,
    },

    /// Transport-level download failure.
    #[error("failed to download {url}: {message}")]
    Download {
        /// The download URL.
        url: String,
        /// Underlying error message.
        message: String,
    },

    /// The archive exists but could not be unpacked.
    #[error("failed to extract {}: {message}", archive.display())]
    Extraction {
        /// Path of the offending archive.
        archive: PathBuf,
        /// Underlying error message.
        message: String,
    },

    /// The Flyway process could not be spawned at all.
    #[error("failed to spawn Flyway process: {message}")]
    Execution {
        /// Underlying error message.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a download error.
    #[must_use]
    pub fn download(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Download {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an extraction error.
    #[must_use]
    pub fn extraction(archive: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Extraction {
            archive: archive.into(),
            message: message.into(),
        }
    }

    /// Create an execution error.
    #[must_use]
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
        }
    }
}
