//! Acquisition strategies for version-pinned Flyway CLI executables.
//!
//! A [`FlywayCliProvider`] turns a requested version into a ready
//! [`flyway_core::FlywayCli`], signalling "not found" with `Ok(None)` so
//! that providers can be chained: [`chain`] composes two providers into one
//! that falls through on both absence and failure.
//!
//! Concrete strategies: [`FileSystemProvider`] (search an installation
//! root), [`ShortCircuitFileSystemProvider`] (trust a known directory),
//! [`DownloadProvider`] (download and keep), and
//! [`SelfCleaningDownloadProvider`] (download into ephemeral storage tracked
//! by a [`CleanupScope`]). [`create_provider`] builds the chain for a
//! [`FlywayCliStrategy`] policy.

pub mod download;
pub mod downloader;
pub mod extract;
pub mod factory;
pub mod filesystem;
pub mod provider;
pub mod scope;
pub mod self_cleaning;
pub mod service;
pub mod short_circuit;

pub use download::DownloadProvider;
pub use downloader::{CliDownloader, HttpCliDownloader};
pub use factory::{FlywayCliStrategy, create_provider, file_system_with_download_fallback};
pub use filesystem::FileSystemProvider;
pub use provider::{FlywayCliProvider, chain};
pub use scope::CleanupScope;
pub use self_cleaning::SelfCleaningDownloadProvider;
pub use short_circuit::ShortCircuitFileSystemProvider;
