//! Download-and-clean acquisition strategy.

use std::sync::Arc;

use async_trait::async_trait;
use flyway_core::{FlywayCli, Result};
use tracing::debug;

use crate::download::DownloadProvider;
use crate::downloader::CliDownloader;
use crate::provider::FlywayCliProvider;
use crate::scope::CleanupScope;

/// Downloads into a fresh ephemeral directory on every acquisition.
///
/// The directory is registered with the given [`CleanupScope`], so no
/// residue survives the scope's teardown.
pub struct SelfCleaningDownloadProvider {
    downloader: Arc<dyn CliDownloader>,
    scope: Arc<CleanupScope>,
}

impl SelfCleaningDownloadProvider {
    /// Create a provider that registers its directories with `scope`.
    #[must_use]
    pub fn new(downloader: Arc<dyn CliDownloader>, scope: Arc<CleanupScope>) -> Self {
        Self { downloader, scope }
    }
}

#[async_trait]
impl FlywayCliProvider for SelfCleaningDownloadProvider {
    fn name(&self) -> &'static str {
        "self-cleaning-download"
    }

    async fn get_cli(&self, version: &str) -> Result<Option<FlywayCli>> {
        let temporary = self.scope.create_directory()?;
        debug!(
            directory = %temporary.display(),
            %version,
            "downloading Flyway CLI into ephemeral directory"
        );
        DownloadProvider::new(temporary, Arc::clone(&self.downloader))
            .get_cli(version)
            .await
    }
}
