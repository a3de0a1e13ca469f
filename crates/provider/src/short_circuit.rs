//! Short-circuit filesystem acquisition strategy.

use std::path::PathBuf;

use async_trait::async_trait;
use flyway_core::{CliSource, FlywayCli, FlywayExecutable, Result};
use tracing::debug;

use crate::provider::FlywayCliProvider;
use crate::service;

/// Treats a fixed directory as an installed CLI without verification.
///
/// Trust assumption: the caller vouches that the directory holds the
/// requested version; only the launcher's presence is checked, and the
/// caller-supplied version label is taken at face value. This skips the
/// search cost when the exact path is already known.
pub struct ShortCircuitFileSystemProvider {
    directory: PathBuf,
}

impl ShortCircuitFileSystemProvider {
    /// Create a provider for a directory known to hold the CLI.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

#[async_trait]
impl FlywayCliProvider for ShortCircuitFileSystemProvider {
    fn name(&self) -> &'static str {
        "short-circuit"
    }

    async fn get_cli(&self, version: &str) -> Result<Option<FlywayCli>> {
        let executable = service::executable_path(&self.directory).await?;

        debug!(
            directory = %self.directory.display(),
            "found a Flyway CLI using the optimized local strategy"
        );

        Ok(Some(FlywayCli {
            version: version.to_string(),
            source: CliSource::FileSystem,
            location: self.directory.clone(),
            executable: FlywayExecutable::new(executable),
        }))
    }
}
