//! Strategy policy and provider construction.

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use crate::download::DownloadProvider;
use crate::downloader::HttpCliDownloader;
use crate::filesystem::FileSystemProvider;
use crate::provider::{FlywayCliProvider, chain};
use crate::scope::CleanupScope;
use crate::self_cleaning::SelfCleaningDownloadProvider;

/// Policy for obtaining the Flyway CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlywayCliStrategy {
    /// Search the CLI directory first, download into it as a fallback.
    #[default]
    LocalCliWithDownloadFallback,
    /// Always download into the CLI directory and keep the result.
    DownloadCliOnly,
    /// Download into ephemeral storage removed at scope teardown.
    DownloadCliAndClean,
}

impl FlywayCliStrategy {
    /// Parse a strategy name.
    ///
    /// Total: an unrecognized name is logged and treated as the default
    /// strategy, never rejected.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().replace('_', "-").as_str() {
            "local-cli-with-download-fallback" => Self::LocalCliWithDownloadFallback,
            "download-cli-only" => Self::DownloadCliOnly,
            "download-cli-and-clean" => Self::DownloadCliAndClean,
            other => {
                warn!(
                    strategy = other,
                    "unknown Flyway CLI strategy, falling back to the default"
                );
                Self::default()
            }
        }
    }
}

impl std::fmt::Display for FlywayCliStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LocalCliWithDownloadFallback => write!(f, "local-cli-with-download-fallback"),
            Self::DownloadCliOnly => write!(f, "download-cli-only"),
            Self::DownloadCliAndClean => write!(f, "download-cli-and-clean"),
        }
    }
}

/// Build the provider chain for a strategy.
///
/// `cli_directory` roots the persistent strategies; `scope` tracks the
/// ephemeral directories of the self-cleaning strategy.
#[must_use]
pub fn create_provider(
    strategy: FlywayCliStrategy,
    cli_directory: &Path,
    scope: &Arc<CleanupScope>,
) -> Box<dyn FlywayCliProvider> {
    match strategy {
        FlywayCliStrategy::DownloadCliAndClean => Box::new(SelfCleaningDownloadProvider::new(
            Arc::new(HttpCliDownloader::new()),
            Arc::clone(scope),
        )),
        FlywayCliStrategy::DownloadCliOnly => Box::new(DownloadProvider::new(
            cli_directory,
            Arc::new(HttpCliDownloader::new()),
        )),
        FlywayCliStrategy::LocalCliWithDownloadFallback => {
            file_system_with_download_fallback(cli_directory)
        }
    }
}

/// Filesystem search chained with a download fallback at the same root.
#[must_use]
pub fn file_system_with_download_fallback(cli_directory: &Path) -> Box<dyn FlywayCliProvider> {
    chain(
        Box::new(FileSystemProvider::new(cli_directory)),
        Box::new(DownloadProvider::new(
            cli_directory,
            Arc::new(HttpCliDownloader::new()),
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_strategies() {
        assert_eq!(
            FlywayCliStrategy::parse("download-cli-and-clean"),
            FlywayCliStrategy::DownloadCliAndClean
        );
        assert_eq!(
            FlywayCliStrategy::parse("DOWNLOAD_CLI_ONLY"),
            FlywayCliStrategy::DownloadCliOnly
        );
        assert_eq!(
            FlywayCliStrategy::parse("local-cli-with-download-fallback"),
            FlywayCliStrategy::LocalCliWithDownloadFallback
        );
    }

    #[test]
    fn test_parse_unknown_strategy_falls_back_to_default() {
        assert_eq!(
            FlywayCliStrategy::parse("teleport-cli-from-orbit"),
            FlywayCliStrategy::LocalCliWithDownloadFallback
        );
    }

    #[test]
    fn test_display_round_trips() {
        for strategy in [
            FlywayCliStrategy::LocalCliWithDownloadFallback,
            FlywayCliStrategy::DownloadCliOnly,
            FlywayCliStrategy::DownloadCliAndClean,
        ] {
            assert_eq!(FlywayCliStrategy::parse(&strategy.to_string()), strategy);
        }
    }
}
