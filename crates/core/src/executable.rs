//! A resolved Flyway CLI and its executable handle.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::FlywayConfig;
use crate::error::{Error, Result};
use crate::options::CommandLineOptions;
use crate::platform::Os;
use crate::response::RawExecutionResponse;

/// Number of characters of output to include in diagnostic log lines.
const LOG_SNIPPET_CHARS: usize = 200;

/// Where a resolved CLI came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliSource {
    /// Found installed on the filesystem.
    FileSystem,
    /// Downloaded and extracted by this process.
    Download,
}

/// A ready-to-run Flyway CLI of a specific version.
///
/// Immutable once constructed; created only by a successful acquisition.
#[derive(Debug, Clone)]
pub struct FlywayCli {
    /// The CLI version, in tagged form (`V9.22.3`).
    pub version: String,
    /// Where the CLI came from.
    pub source: CliSource,
    /// The installation directory.
    pub location: PathBuf,
    /// Handle to the launcher inside `location`.
    pub executable: FlywayExecutable,
}

/// A Flyway command verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlywayCommand {
    /// Apply pending migrations.
    Migrate,
    /// Drop all objects in the configured schemas.
    Clean,
    /// Show the status of all migrations.
    Info,
    /// Validate applied migrations against available ones.
    Validate,
    /// Repair the schema history table.
    Repair,
}

impl std::fmt::Display for FlywayCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Migrate => write!(f, "migrate"),
            Self::Clean => write!(f, "clean"),
            Self::Info => write!(f, "info"),
            Self::Validate => write!(f, "validate"),
            Self::Repair => write!(f, "repair"),
        }
    }
}

/// Handle to a Flyway launcher on disk.
#[derive(Debug, Clone)]
pub struct FlywayExecutable {
    path: PathBuf,
}

impl FlywayExecutable {
    /// Wrap a launcher path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the launcher.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build the full command line for a verb and configuration.
    #[must_use]
    pub fn build_command(&self, command: FlywayCommand, config: &FlywayConfig) -> String {
        let options = CommandLineOptions::build(config, Os::current());
        format!(
            "{} {} {command} -outputType=json",
            self.path.display(),
            options.to_command_string()
        )
    }

    /// Run a Flyway command and capture its response.
    ///
    /// A non-zero exit from Flyway is not an error: it is returned as a
    /// response with `success` set to false so callers can inspect the
    /// payload. Only failure to spawn the process at all errors.
    pub async fn execute(
        &self,
        command: FlywayCommand,
        config: &FlywayConfig,
    ) -> Result<RawExecutionResponse> {
        let command_line = self.build_command(command, config);
        debug!(%command_line, "executing Flyway command");

        let output = shell(&command_line)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::execution(format!("{command}: {e}")))?;

        let response = RawExecutionResponse {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if response.success {
            debug!(
                output = snippet(&response.stdout),
                "Flyway command executed successfully"
            );
        } else {
            warn!(
                exit = output.status.code(),
                output = snippet(&response.stdout),
                "Flyway command reported failure"
            );
        }

        Ok(response)
    }
}

/// Run a command line through the platform shell.
fn shell(command_line: &str) -> Command {
    #[cfg(windows)]
    {
        let mut command = Command::new("cmd");
        command.arg("/C").arg(command_line);
        command
    }
    #[cfg(not(windows))]
    {
        let mut command = Command::new("sh");
        command.arg("-c").arg(command_line);
        command
    }
}

fn snippet(output: &str) -> &str {
    let end = output
        .char_indices()
        .nth(LOG_SNIPPET_CHARS)
        .map_or(output.len(), |(index, _)| index);
    &output[..end]
}
