//! Command-line interface definition and error rendering.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use flyway_core::{ConfigOverride, FlywayConfig};
use miette::Diagnostic;
use thiserror::Error;

/// Exit code for a successful Flyway run.
pub const EXIT_OK: i32 = 0;
/// Exit code when Flyway ran but reported failure.
pub const EXIT_FLYWAY_FAILED: i32 = 1;
/// Exit code for CLI or configuration errors.
pub const EXIT_CLI: i32 = 2;
/// Exit code for acquisition or execution errors.
pub const EXIT_CORE: i32 = 3;

/// CLI-specific error types with exit-code mapping.
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// CLI or configuration error (exit code 2).
    #[error("configuration error: {message}")]
    #[diagnostic(code(flyway::cli::config))]
    Config {
        /// The error message.
        message: String,
        /// Optional help text.
        #[help]
        help: Option<String>,
    },
    /// Acquisition or execution error (exit code 3).
    #[error(transparent)]
    #[diagnostic(code(flyway::cli::core))]
    Core(#[from] flyway_core::Error),
}

impl CliError {
    /// Create a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a configuration error with help text.
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

/// Map an error to its process exit code.
#[must_use]
pub const fn exit_code_for(error: &CliError) -> i32 {
    match error {
        CliError::Config { .. } => EXIT_CLI,
        CliError::Core(_) => EXIT_CORE,
    }
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace-level output.
    Trace,
    /// Debug-level output.
    Debug,
    /// Informational output.
    Info,
    /// Warnings only.
    Warn,
    /// Errors only.
    Error,
}

impl LogLevel {
    /// The `tracing` filter directive for this level.
    #[must_use]
    pub const fn directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.directive())
    }
}

/// Run Flyway database migrations with a version-pinned CLI.
#[derive(Debug, Parser)]
#[command(name = "flyway-rs", version, about)]
pub struct Cli {
    /// Flyway command to run.
    #[command(subcommand)]
    pub command: Commands,

    /// JDBC connection URL.
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Database user.
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Database password.
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Default schema.
    #[arg(long, global = true)]
    pub schema: Option<String>,

    /// Migration location; may be given multiple times.
    #[arg(long = "location", global = true)]
    pub locations: Vec<String>,

    /// JSON configuration file; flags override its fields.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Flyway version to acquire, in tagged form (e.g. V9.22.3).
    #[arg(long, global = true)]
    pub flyway_version: Option<String>,

    /// CLI acquisition strategy; unknown names fall back to the default.
    #[arg(long, global = true)]
    pub strategy: Option<String>,

    /// Root directory for persistently installed CLIs.
    #[arg(long, global = true)]
    pub cli_directory: Option<PathBuf>,

    /// Log verbosity.
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub level: LogLevel,
}

/// The Flyway command verbs.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum Commands {
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

impl Cli {
    /// Assemble the session configuration from the config file and flags.
    ///
    /// # Errors
    ///
    /// Returns an error when neither source supplies the required fields or
    /// the config file cannot be read or parsed.
    pub fn build_config(&self) -> Result<FlywayConfig, CliError> {
        let base = match &self.config {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    CliError::config(format!("failed to read {}: {e}", path.display()))
                })?;
                Some(serde_json::from_str::<FlywayConfig>(&content).map_err(|e| {
                    CliError::config(format!("failed to parse {}: {e}", path.display()))
                })?)
            }
            None => None,
        };

        let Some(mut config) = base.map_or_else(
            || {
                match (&self.url, &self.user) {
                    (Some(url), Some(user)) => Some(FlywayConfig::new(
                        url.clone(),
                        user.clone(),
                        self.locations.clone(),
                    )),
                    _ => None,
                }
            },
            Some,
        ) else {
            return Err(CliError::config_with_help(
                "no connection configured",
                "Pass --url and --user, or point --config at a JSON configuration file",
            ));
        };

        let overrides = ConfigOverride {
            url: self.url.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            default_schema: self.schema.clone(),
            migration_locations: (!self.locations.is_empty()).then(|| self.locations.clone()),
            advanced: None,
        };
        config = config.merged(&overrides);

        if config.migration_locations.is_empty() {
            return Err(CliError::config_with_help(
                "no migration locations configured",
                "Pass --location at least once or list migrationLocations in the config file",
            ));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_migrate_with_flags() {
        let cli = parse(&[
            "flyway-rs",
            "migrate",
            "--url",
            "jdbc:postgresql://localhost/postgres",
            "--user",
            "postgres",
            "--location",
            "migrations/a",
            "--location",
            "migrations/b",
        ]);
        assert!(matches!(cli.command, Commands::Migrate));

        let config = cli.build_config().unwrap();
        assert_eq!(config.user, "postgres");
        assert_eq!(config.migration_locations.len(), 2);
    }

    #[test]
    fn test_missing_connection_is_a_config_error() {
        let cli = parse(&["flyway-rs", "info"]);
        let error = cli.build_config().unwrap_err();
        assert_eq!(exit_code_for(&error), EXIT_CLI);
    }

    #[test]
    fn test_missing_locations_is_a_config_error() {
        let cli = parse(&["flyway-rs", "migrate", "--url", "u", "--user", "x"]);
        assert!(cli.build_config().is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flyway.json");
        std::fs::write(
            &path,
            r#"{"url":"file-url","user":"file-user","migrationLocations":["file-loc"]}"#,
        )
        .unwrap();

        let cli = parse(&[
            "flyway-rs",
            "migrate",
            "--config",
            path.to_str().unwrap(),
            "--user",
            "flag-user",
        ]);
        let config = cli.build_config().unwrap();
        assert_eq!(config.url, "file-url");
        assert_eq!(config.user, "flag-user");
        assert_eq!(config.migration_locations, vec!["file-loc".to_string()]);
    }

    #[test]
    fn test_core_errors_map_to_core_exit_code() {
        let error = CliError::from(flyway_core::Error::CliUnavailable {
            requested: "V9.22.3".to_string(),
        });
        assert_eq!(exit_code_for(&error), EXIT_CORE);
    }
}
