//! Tracking of ephemeral CLI directories.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use flyway_core::Result;
use tempfile::TempDir;
use tracing::{debug, warn};

/// An explicit scope for ephemeral CLI directories.
///
/// Self-cleaning acquisition registers each temporary directory it creates
/// here; all registered directories are removed when the scope is dropped
/// or [`CleanupScope::cleanup`] is called. Threading the scope through
/// construction keeps teardown explicit instead of relying on a
/// process-wide tracker.
#[derive(Debug, Default)]
pub struct CleanupScope {
    directories: Mutex<Vec<TempDir>>,
}

impl CleanupScope {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh temporary directory registered with this scope.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn create_directory(&self) -> Result<PathBuf> {
        let directory = tempfile::tempdir()?;
        let path = directory.path().to_path_buf();
        self.directories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(directory);
        debug!(directory = %path.display(), "registered ephemeral CLI directory");
        Ok(path)
    }

    /// Remove every directory registered so far.
    ///
    /// Removal failures are logged and never propagated; dropping the scope
    /// has the same effect.
    pub fn cleanup(&self) {
        let directories = std::mem::take(
            &mut *self
                .directories
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for directory in directories {
            let path = directory.path().to_path_buf();
            if let Err(error) = directory.close() {
                warn!(directory = %path.display(), %error, "failed to remove ephemeral directory");
            }
        }
    }
}
