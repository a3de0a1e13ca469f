//! Run version-pinned Flyway database migrations from Rust.
//!
//! [`Flyway`] ties the pieces together: it acquires a CLI of the configured
//! version through the configured [`FlywayCliStrategy`], serializes the
//! session configuration into command-line options, invokes the CLI, and
//! returns the raw response.
//!
//! ```ignore
//! let flyway = Flyway::new(FlywayConfig::new(url, user, locations));
//! let response = flyway.migrate(None).await?;
//! assert!(response.success);
//! ```

pub mod cli;
mod defaults;

use std::path::PathBuf;
use std::sync::Arc;

use flyway_core::FlywayCommand;
use flyway_provider::{CleanupScope, create_provider};
use tracing::{debug, info};

pub use defaults::{DEFAULT_FLYWAY_VERSION, default_cli_directory};
pub use flyway_core::{
    AdvancedConfig, CliSource, ConfigOverride, Error, FlywayCli, FlywayConfig, FlywayExecutable,
    RawExecutionResponse, Result,
};
pub use flyway_provider::{FlywayCliProvider, FlywayCliStrategy};

/// Session-level options controlling CLI acquisition.
#[derive(Debug, Clone)]
pub struct FlywayOptions {
    /// The Flyway version to acquire, in tagged form (`V9.22.3`).
    pub version: String,
    /// The acquisition policy.
    pub strategy: FlywayCliStrategy,
    /// Root directory for the persistent strategies.
    pub cli_directory: PathBuf,
}

impl Default for FlywayOptions {
    fn default() -> Self {
        Self {
            version: DEFAULT_FLYWAY_VERSION.to_string(),
            strategy: FlywayCliStrategy::DownloadCliAndClean,
            cli_directory: default_cli_directory(),
        }
    }
}

impl FlywayOptions {
    /// Set the Flyway version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the acquisition strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: FlywayCliStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the CLI directory.
    #[must_use]
    pub fn with_cli_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.cli_directory = directory.into();
        self
    }
}

/// A Flyway session: configuration plus acquisition options.
///
/// Ephemeral CLI directories created by the download-and-clean strategy
/// live as long as this value; they are removed when it is dropped.
pub struct Flyway {
    config: FlywayConfig,
    options: FlywayOptions,
    scope: Arc<CleanupScope>,
}

impl Flyway {
    /// Create a session with default acquisition options.
    #[must_use]
    pub fn new(config: FlywayConfig) -> Self {
        Self::with_options(config, FlywayOptions::default())
    }

    /// Create a session with explicit acquisition options.
    #[must_use]
    pub fn with_options(config: FlywayConfig, options: FlywayOptions) -> Self {
        Self {
            config,
            options,
            scope: Arc::new(CleanupScope::new()),
        }
    }

    /// The session configuration.
    #[must_use]
    pub const fn config(&self) -> &FlywayConfig {
        &self.config
    }

    /// The session acquisition options.
    #[must_use]
    pub const fn options(&self) -> &FlywayOptions {
        &self.options
    }

    /// Apply pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error when no CLI could be acquired or the process could
    /// not be spawned; a run Flyway itself reports as failed is a normal
    /// response with `success` set to false.
    pub async fn migrate(&self, overrides: Option<&ConfigOverride>) -> Result<RawExecutionResponse> {
        self.execute(FlywayCommand::Migrate, overrides).await
    }

    /// Drop all objects in the configured schemas.
    ///
    /// # Errors
    ///
    /// See [`Flyway::migrate`].
    pub async fn clean(&self, overrides: Option<&ConfigOverride>) -> Result<RawExecutionResponse> {
        self.execute(FlywayCommand::Clean, overrides).await
    }

    /// Show the status of all migrations.
    ///
    /// # Errors
    ///
    /// See [`Flyway::migrate`].
    pub async fn info(&self, overrides: Option<&ConfigOverride>) -> Result<RawExecutionResponse> {
        self.execute(FlywayCommand::Info, overrides).await
    }

    /// Validate applied migrations against available ones.
    ///
    /// # Errors
    ///
    /// See [`Flyway::migrate`].
    pub async fn validate(
        &self,
        overrides: Option<&ConfigOverride>,
    ) -> Result<RawExecutionResponse> {
        self.execute(FlywayCommand::Validate, overrides).await
    }

    /// Repair the schema history table.
    ///
    /// # Errors
    ///
    /// See [`Flyway::migrate`].
    pub async fn repair(&self, overrides: Option<&ConfigOverride>) -> Result<RawExecutionResponse> {
        self.execute(FlywayCommand::Repair, overrides).await
    }

    /// Remove any ephemeral CLI directories created so far.
    pub fn cleanup(&self) {
        self.scope.cleanup();
    }

    async fn execute(
        &self,
        command: FlywayCommand,
        overrides: Option<&ConfigOverride>,
    ) -> Result<RawExecutionResponse> {
        let merged;
        let config = match overrides {
            Some(overrides) => {
                merged = self.config.merged(overrides);
                &merged
            }
            None => &self.config,
        };

        let provider = create_provider(
            self.options.strategy,
            &self.options.cli_directory,
            &self.scope,
        );
        let cli = provider
            .get_cli(&self.options.version)
            .await?
            .ok_or_else(|| Error::CliUnavailable {
                requested: self.options.version.clone(),
            })?;

        info!(
            version = %cli.version,
            source = ?cli.source,
            location = %cli.location.display(),
            %command,
            "acquired Flyway CLI"
        );
        debug!(executable = %cli.executable.path().display(), "invoking Flyway");

        cli.executable.execute(command, config).await
    }
}
