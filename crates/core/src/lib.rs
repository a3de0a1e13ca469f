//! Core types for driving the Flyway command-line tool.
//!
//! This crate carries everything needed to describe *what* to run:
//! the typed migration configuration, its translation into command-line
//! option tokens, version-to-download-URL resolution, and the executable
//! handle that invokes a resolved CLI and reports a structured response.
//!
//! Acquiring the CLI itself (filesystem search, download, extraction) lives
//! in `flyway-provider`.

pub mod config;
pub mod error;
pub mod executable;
pub mod options;
pub mod platform;
pub mod response;
pub mod version;

pub use config::{AdvancedConfig, ConfigOverride, FlywayConfig};
pub use error::{Error, Result};
pub use executable::{CliSource, FlywayCli, FlywayCommand, FlywayExecutable};
pub use options::CommandLineOptions;
pub use platform::{Arch, Os, Platform};
pub use response::RawExecutionResponse;
