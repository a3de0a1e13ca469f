//! Session defaults.

use std::path::PathBuf;

/// Flyway version acquired when none is configured.
pub const DEFAULT_FLYWAY_VERSION: &str = "V9.22.3";

/// Default root directory for persistently installed CLIs.
///
/// `~/.flyway-rs`, falling back to the working directory when no home
/// directory can be determined.
#[must_use]
pub fn default_cli_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".flyway-rs")
}
