//! Downloading Flyway CLI archives.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use flyway_core::{Arch, Error, Os, Result};
use flyway_core::version::{CliUrl, build_url};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// Downloads a compressed Flyway CLI archive into a save directory.
///
/// `download_location` is where `download` will leave the archive; callers
/// use it to detect a pre-existing archive without touching the network.
#[async_trait]
pub trait CliDownloader: Send + Sync {
    /// The path the archive for this version would be saved at.
    fn download_location(&self, version: &str, save_directory: &Path) -> PathBuf;

    /// Download the archive, returning its saved path.
    ///
    /// # Errors
    ///
    /// Returns an error on any transport-level failure.
    async fn download(&self, version: &str, save_directory: &Path) -> Result<PathBuf>;
}

/// Downloads archives directly from the Flyway artifact repository.
pub struct HttpCliDownloader {
    client: reqwest::Client,
}

impl Default for HttpCliDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpCliDownloader {
    /// Create a new downloader.
    ///
    /// # Panics
    ///
    /// Building the HTTP client only fails when the TLS backend cannot
    /// initialize, which indicates a broken environment.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("flyway-rs")
                .build()
                .expect("failed to initialize HTTP client"),
        }
    }

    fn cli_url(version: &str) -> CliUrl {
        build_url(version, Os::current(), Arch::current())
    }
}

#[async_trait]
impl CliDownloader for HttpCliDownloader {
    fn download_location(&self, version: &str, save_directory: &Path) -> PathBuf {
        save_directory.join(Self::cli_url(version).file_name)
    }

    async fn download(&self, version: &str, save_directory: &Path) -> Result<PathBuf> {
        let cli_url = Self::cli_url(version);
        info!(url = %cli_url.url, "downloading Flyway CLI");

        let response = self
            .client
            .get(&cli_url.url)
            .send()
            .await
            .map_err(|e| Error::download(&cli_url.url, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::download(
                &cli_url.url,
                format!("HTTP {}", response.status()),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::download(&cli_url.url, e.to_string()))?;

        let destination = save_directory.join(&cli_url.file_name);
        tokio::fs::write(&destination, &bytes).await?;

        let digest = format!("{:x}", Sha256::digest(&bytes));
        debug!(
            archive = %destination.display(),
            bytes = bytes.len(),
            %digest,
            "downloaded Flyway CLI archive"
        );

        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_location_uses_platform_file_name() {
        let downloader = HttpCliDownloader::new();
        let location = downloader.download_location("V9.22.3", Path::new("/tmp/cli"));
        let expected = build_url("V9.22.3", Os::current(), Arch::current()).file_name;
        assert_eq!(location, Path::new("/tmp/cli").join(expected));
    }
}
