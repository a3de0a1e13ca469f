//! Filesystem-search acquisition strategy.

use std::path::PathBuf;

use async_trait::async_trait;
use flyway_core::{CliSource, Error, FlywayCli, FlywayExecutable, Result};
use futures::future::join_all;
use tracing::debug;

use crate::provider::FlywayCliProvider;
use crate::service;

/// Searches an installation root for a CLI of the requested version.
///
/// The root itself is checked first: a matching install resolves
/// immediately, a mismatching one is a hard error. Otherwise the immediate
/// child directories are probed concurrently; selection is the first match
/// in directory-listing order, so a (currently impossible) multi-match is
/// resolved deterministically.
pub struct FileSystemProvider {
    directory: PathBuf,
}

impl FileSystemProvider {
    /// Create a provider rooted at the given directory.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    async fn cli_at(&self, version: &str, location: PathBuf) -> Result<FlywayCli> {
        let executable = service::executable_path(&location).await?;
        Ok(FlywayCli {
            version: version.to_string(),
            source: CliSource::FileSystem,
            location,
            executable: FlywayExecutable::new(executable),
        })
    }
}

#[async_trait]
impl FlywayCliProvider for FileSystemProvider {
    fn name(&self) -> &'static str {
        "filesystem"
    }

    async fn get_cli(&self, version: &str) -> Result<Option<FlywayCli>> {
        if let Some(existing) = service::installed_version(&self.directory).await? {
            if existing == version {
                return Ok(Some(self.cli_at(version, self.directory.clone()).await?));
            }
            return Err(Error::VersionMismatch {
                directory: self.directory.clone(),
                found: existing,
                requested: version.to_string(),
            });
        }

        debug!(
            directory = %self.directory.display(),
            %version,
            "directory is not a Flyway CLI, probing child directories"
        );

        let mut children = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.directory).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                children.push(entry.path());
            }
        }

        let probes = join_all(children.iter().map(|child| service::installed_version(child)));

        let mut matched = None;
        let mut other_versions = Vec::new();
        for (child, probe) in children.iter().zip(probes.await) {
            match probe? {
                Some(found) if found == version => {
                    if matched.is_none() {
                        matched = Some(child.clone());
                    }
                }
                Some(found) => other_versions.push(found),
                None => {}
            }
        }

        if let Some(location) = matched {
            return Ok(Some(self.cli_at(version, location).await?));
        }

        if other_versions.is_empty() {
            Ok(None)
        } else {
            Err(Error::NoMatchingVersion {
                directory: self.directory.clone(),
                requested: version.to_string(),
                found: other_versions,
            })
        }
    }
}
