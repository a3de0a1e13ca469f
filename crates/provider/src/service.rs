//! Probing directories for installed Flyway CLIs.
//!
//! Extracted Flyway distributions unpack to a `flyway-{version}` directory
//! with the launcher at its root. A directory counts as an installed CLI
//! when the launcher is present; the version is read from the directory
//! name and reported in tagged form (`V9.22.3`).

use std::path::{Path, PathBuf};

use flyway_core::{Error, Result};

/// Launcher filename inside an installed CLI directory.
#[cfg(windows)]
const LAUNCHER: &str = "flyway.cmd";
/// Launcher filename inside an installed CLI directory.
#[cfg(not(windows))]
const LAUNCHER: &str = "flyway";

/// The installed CLI version of a directory, if it holds one.
///
/// Returns `Ok(None)` for directories that are not installed CLIs,
/// including directories that do not exist.
///
/// # Errors
///
/// Returns an error when the directory cannot be inspected.
pub async fn installed_version(directory: &Path) -> Result<Option<String>> {
    if !tokio::fs::try_exists(&directory.join(LAUNCHER)).await? {
        return Ok(None);
    }
    Ok(version_from_directory_name(directory))
}

/// Path of the launcher inside an installed CLI directory.
///
/// # Errors
///
/// Returns [`Error::NotAnInstalledCli`] when the directory holds no
/// launcher.
pub async fn executable_path(directory: &Path) -> Result<PathBuf> {
    let launcher = directory.join(LAUNCHER);
    if tokio::fs::try_exists(&launcher).await? {
        Ok(launcher)
    } else {
        Err(Error::NotAnInstalledCli(directory.to_path_buf()))
    }
}

fn version_from_directory_name(directory: &Path) -> Option<String> {
    directory
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_prefix("flyway-"))
        .filter(|version| !version.is_empty())
        .map(|version| format!("V{version}"))
}
