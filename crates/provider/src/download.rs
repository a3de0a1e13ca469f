//! Download-and-keep acquisition strategy.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use flyway_core::version::url_components;
use flyway_core::{CliSource, FlywayCli, FlywayExecutable, Result};
use tracing::debug;

use crate::downloader::CliDownloader;
use crate::extract::extract_archive;
use crate::provider::FlywayCliProvider;
use crate::service;

/// Downloads and extracts a CLI into a persistent directory.
///
/// Acquisition is idempotent: an already-extracted install is reused, an
/// already-present archive skips the download, and the archive is deleted
/// once extraction succeeds.
pub struct DownloadProvider {
    directory: PathBuf,
    downloader: Arc<dyn CliDownloader>,
}

impl DownloadProvider {
    /// Create a provider rooted at the given directory.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>, downloader: Arc<dyn CliDownloader>) -> Self {
        Self {
            directory: directory.into(),
            downloader,
        }
    }
}

#[async_trait]
impl FlywayCliProvider for DownloadProvider {
    fn name(&self) -> &'static str {
        "download"
    }

    async fn get_cli(&self, version: &str) -> Result<Option<FlywayCli>> {
        let components = url_components(version);
        let target = self
            .directory
            .join(format!("flyway-{}", components.version_string));

        if service::installed_version(&target).await?.is_some() {
            debug!(
                directory = %target.display(),
                %version,
                "reusing previously extracted Flyway CLI"
            );
            let executable = service::executable_path(&target).await?;
            return Ok(Some(cli(version, target, executable)));
        }

        let archive = self.downloader.download_location(version, &self.directory);
        if tokio::fs::try_exists(&archive).await? {
            debug!(archive = %archive.display(), "reusing existing archive");
        } else {
            tokio::fs::create_dir_all(&self.directory).await?;
            self.downloader.download(version, &self.directory).await?;
        }

        extract_archive(&archive, &self.directory)?;
        tokio::fs::remove_file(&archive).await?;

        let executable = service::executable_path(&target).await?;
        Ok(Some(cli(version, target, executable)))
    }
}

fn cli(version: &str, location: PathBuf, executable: PathBuf) -> FlywayCli {
    FlywayCli {
        version: version.to_string(),
        source: CliSource::Download,
        location,
        executable: FlywayExecutable::new(executable),
    }
}
