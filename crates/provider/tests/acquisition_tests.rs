//! Acquisition behavior across the filesystem and download strategies.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use flate2::Compression;
use flate2::write::GzEncoder;
use flyway_core::{CliSource, Error, Result};
use flyway_provider::{
    CleanupScope, CliDownloader, DownloadProvider, FileSystemProvider, FlywayCliProvider,
    FlywayCliStrategy, SelfCleaningDownloadProvider, ShortCircuitFileSystemProvider,
    create_provider,
};

const ARCHIVE_NAME: &str = "flyway-commandline-8.5.0-linux-x64.tar.gz";

/// Downloader that materializes a minimal CLI archive instead of using the
/// network, counting how often it is invoked.
struct MockCliDownloader {
    downloads: AtomicUsize,
}

impl MockCliDownloader {
    fn new() -> Self {
        Self {
            downloads: AtomicUsize::new(0),
        }
    }

    fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    fn write_archive(save_directory: &Path) -> PathBuf {
        let archive = save_directory.join(ARCHIVE_NAME);
        let content = b"#!/bin/sh\necho flyway\n";
        let file = std::fs::File::create(&archive).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, "flyway-8.5.0/flyway", content.as_slice())
            .unwrap();
        builder.into_inner().unwrap().finish().unwrap();
        archive
    }
}

#[async_trait]
impl CliDownloader for MockCliDownloader {
    fn download_location(&self, _version: &str, save_directory: &Path) -> PathBuf {
        save_directory.join(ARCHIVE_NAME)
    }

    async fn download(&self, version: &str, save_directory: &Path) -> Result<PathBuf> {
        assert_eq!(version, "V8.5.0", "mock only serves V8.5.0");
        self.downloads.fetch_add(1, Ordering::SeqCst);
        Ok(Self::write_archive(save_directory))
    }
}

/// Downloader that always fails at the transport level.
struct FailingDownloader;

#[async_trait]
impl CliDownloader for FailingDownloader {
    fn download_location(&self, _version: &str, save_directory: &Path) -> PathBuf {
        save_directory.join(ARCHIVE_NAME)
    }

    async fn download(&self, _version: &str, _save_directory: &Path) -> Result<PathBuf> {
        Err(Error::download("http://example.invalid", "connection refused"))
    }
}

fn install_cli(root: &Path, version: &str) -> PathBuf {
    let directory = root.join(format!("flyway-{version}"));
    std::fs::create_dir_all(&directory).unwrap();
    std::fs::write(directory.join("flyway"), "#!/bin/sh\n").unwrap();
    directory
}

mod filesystem {
    use super::*;

    #[tokio::test]
    async fn resolves_matching_child_directory() {
        let root = tempfile::tempdir().unwrap();
        let installed = install_cli(root.path(), "7.11.2");

        let provider = FileSystemProvider::new(root.path());
        let cli = provider.get_cli("V7.11.2").await.unwrap().unwrap();

        assert_eq!(cli.version, "V7.11.2");
        assert_eq!(cli.source, CliSource::FileSystem);
        assert_eq!(cli.location, installed);
        assert_eq!(cli.executable.path(), installed.join("flyway"));
    }

    #[tokio::test]
    async fn resolves_when_root_itself_is_the_requested_cli() {
        let root = tempfile::tempdir().unwrap();
        let installed = install_cli(root.path(), "9.22.3");

        let provider = FileSystemProvider::new(&installed);
        let cli = provider.get_cli("V9.22.3").await.unwrap().unwrap();
        assert_eq!(cli.location, installed);
    }

    #[tokio::test]
    async fn root_with_other_version_is_a_mismatch_error() {
        let root = tempfile::tempdir().unwrap();
        let installed = install_cli(root.path(), "7.11.2");

        let provider = FileSystemProvider::new(&installed);
        let result = provider.get_cli("V9.22.3").await;

        match result {
            Err(Error::VersionMismatch { found, requested, .. }) => {
                assert_eq!(found, "V7.11.2");
                assert_eq!(requested, "V9.22.3");
            }
            other => panic!("expected VersionMismatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn wrong_versions_are_enumerated_in_the_failure() {
        let root = tempfile::tempdir().unwrap();
        install_cli(root.path(), "1");

        let provider = FileSystemProvider::new(root.path());
        let result = provider.get_cli("V2").await;

        match result {
            Err(Error::NoMatchingVersion { found, .. }) => {
                assert_eq!(found, vec!["V1".to_string()]);
            }
            other => panic!("expected NoMatchingVersion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_root_is_not_found() {
        let root = tempfile::tempdir().unwrap();
        let provider = FileSystemProvider::new(root.path());
        assert!(provider.get_cli("V9.22.3").await.unwrap().is_none());
    }
}

mod short_circuit {
    use super::*;

    #[tokio::test]
    async fn trusts_the_caller_supplied_version_label() {
        let root = tempfile::tempdir().unwrap();
        // Deliberately a different installed version: the provider does not verify.
        let installed = install_cli(root.path(), "7.11.2");

        let provider = ShortCircuitFileSystemProvider::new(&installed);
        let cli = provider.get_cli("V9.22.3").await.unwrap().unwrap();
        assert_eq!(cli.version, "V9.22.3");
        assert_eq!(cli.executable.path(), installed.join("flyway"));
    }

    #[tokio::test]
    async fn propagates_lookup_failure() {
        let provider = ShortCircuitFileSystemProvider::new("/nonexistent/flyway-cli");
        let result = provider.get_cli("V9.22.3").await;
        assert!(matches!(result, Err(Error::NotAnInstalledCli(_))));
    }
}

mod download {
    use super::*;

    #[tokio::test]
    async fn downloads_and_extracts_a_cli() {
        let root = tempfile::tempdir().unwrap();
        let provider = DownloadProvider::new(root.path(), Arc::new(MockCliDownloader::new()));

        let cli = provider.get_cli("V8.5.0").await.unwrap().unwrap();
        assert_eq!(cli.source, CliSource::Download);
        assert_eq!(
            cli.executable.path(),
            root.path().join("flyway-8.5.0").join("flyway")
        );
    }

    #[tokio::test]
    async fn second_acquisition_reuses_the_extracted_cli() {
        let root = tempfile::tempdir().unwrap();
        let downloader: Arc<MockCliDownloader> = Arc::new(MockCliDownloader::new());
        let provider =
            DownloadProvider::new(root.path(), Arc::clone(&downloader) as Arc<dyn CliDownloader>);

        let first = provider.get_cli("V8.5.0").await.unwrap().unwrap();
        let second = provider.get_cli("V8.5.0").await.unwrap().unwrap();

        assert_eq!(first.executable.path(), second.executable.path());
        assert_eq!(downloader.download_count(), 1);
    }

    #[tokio::test]
    async fn reuses_a_pre_existing_archive_without_downloading() {
        let root = tempfile::tempdir().unwrap();
        MockCliDownloader::write_archive(root.path());

        let downloader: Arc<MockCliDownloader> = Arc::new(MockCliDownloader::new());
        let provider =
            DownloadProvider::new(root.path(), Arc::clone(&downloader) as Arc<dyn CliDownloader>);

        let cli = provider.get_cli("V8.5.0").await.unwrap().unwrap();
        assert_eq!(
            cli.executable.path(),
            root.path().join("flyway-8.5.0").join("flyway")
        );
        assert_eq!(downloader.download_count(), 0);
    }

    #[tokio::test]
    async fn archive_is_deleted_after_extraction() {
        let root = tempfile::tempdir().unwrap();
        let provider = DownloadProvider::new(root.path(), Arc::new(MockCliDownloader::new()));

        provider.get_cli("V8.5.0").await.unwrap();
        assert!(!root.path().join(ARCHIVE_NAME).exists());
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let root = tempfile::tempdir().unwrap();
        let provider = DownloadProvider::new(root.path(), Arc::new(FailingDownloader));
        let result = provider.get_cli("V8.5.0").await;
        assert!(matches!(result, Err(Error::Download { .. })));
    }
}

mod self_cleaning {
    use super::*;

    #[tokio::test]
    async fn scope_teardown_removes_the_downloaded_cli() {
        let scope = Arc::new(CleanupScope::new());
        let provider = SelfCleaningDownloadProvider::new(
            Arc::new(MockCliDownloader::new()),
            Arc::clone(&scope),
        );

        let cli = provider.get_cli("V8.5.0").await.unwrap().unwrap();
        assert!(cli.executable.path().is_file());

        scope.cleanup();
        assert!(!cli.location.exists());
    }

    #[tokio::test]
    async fn each_acquisition_uses_a_fresh_directory() {
        let scope = Arc::new(CleanupScope::new());
        let provider = SelfCleaningDownloadProvider::new(
            Arc::new(MockCliDownloader::new()),
            Arc::clone(&scope),
        );

        let first = provider.get_cli("V8.5.0").await.unwrap().unwrap();
        let second = provider.get_cli("V8.5.0").await.unwrap().unwrap();
        assert_ne!(first.location, second.location);

        scope.cleanup();
        assert!(!first.location.exists());
        assert!(!second.location.exists());
    }
}

mod factory {
    use super::*;

    #[tokio::test]
    async fn default_chain_resolves_from_an_existing_install() {
        let root = tempfile::tempdir().unwrap();
        install_cli(root.path(), "9.22.3");

        let scope = Arc::new(CleanupScope::new());
        let provider = create_provider(
            FlywayCliStrategy::parse("definitely-not-a-strategy"),
            root.path(),
            &scope,
        );

        // Resolves via the filesystem half of the chain; the download
        // fallback is never consulted.
        let cli = provider.get_cli("V9.22.3").await.unwrap().unwrap();
        assert_eq!(cli.source, CliSource::FileSystem);
    }
}
