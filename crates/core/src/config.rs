//! Typed Flyway configuration.
//!
//! [`FlywayConfig`] carries the handful of fields every invocation needs;
//! [`AdvancedConfig`] layers the full set of optional Flyway options on top.
//! Field order matters: command-line tokens are emitted in the declared
//! order below, so it is kept in lockstep with the option table in
//! [`crate::options`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Connection and migration-source configuration for one Flyway session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlywayConfig {
    /// JDBC connection URL.
    pub url: String,
    /// Database user.
    pub user: String,
    /// Database password.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub password: Option<String>,
    /// Schema Flyway connects to by default.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default_schema: Option<String>,
    /// One or more locations holding migration scripts.
    pub migration_locations: Vec<String>,
    /// Optional fine-grained Flyway options.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub advanced: Option<AdvancedConfig>,
}

impl FlywayConfig {
    /// Create a configuration from the required fields.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        user: impl Into<String>,
        migration_locations: Vec<String>,
    ) -> Self {
        Self {
            url: url.into(),
            user: user.into(),
            password: None,
            default_schema: None,
            migration_locations,
            advanced: None,
        }
    }

    /// Set the password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the default schema.
    #[must_use]
    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = Some(schema.into());
        self
    }

    /// Set the advanced options.
    #[must_use]
    pub fn with_advanced(mut self, advanced: AdvancedConfig) -> Self {
        self.advanced = Some(advanced);
        self
    }

    /// Apply a per-call override on top of this configuration.
    ///
    /// Field-wise shallow merge: a `Some` in the override replaces the
    /// session value, `advanced` is replaced wholesale.
    #[must_use]
    pub fn merged(&self, overrides: &ConfigOverride) -> Self {
        Self {
            url: overrides.url.clone().unwrap_or_else(|| self.url.clone()),
            user: overrides.user.clone().unwrap_or_else(|| self.user.clone()),
            password: overrides.password.clone().or_else(|| self.password.clone()),
            default_schema: overrides
                .default_schema
                .clone()
                .or_else(|| self.default_schema.clone()),
            migration_locations: overrides
                .migration_locations
                .clone()
                .unwrap_or_else(|| self.migration_locations.clone()),
            advanced: overrides.advanced.clone().or_else(|| self.advanced.clone()),
        }
    }
}

/// Per-call configuration override, merged over the session defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverride {
    /// Replacement connection URL.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub url: Option<String>,
    /// Replacement database user.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user: Option<String>,
    /// Replacement password.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub password: Option<String>,
    /// Replacement default schema.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default_schema: Option<String>,
    /// Replacement migration locations.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub migration_locations: Option<Vec<String>>,
    /// Replacement advanced options (replaces the whole record).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub advanced: Option<AdvancedConfig>,
}

/// The full set of optional Flyway options.
///
/// Every field is independently nullable; only set fields produce
/// command-line tokens. The declared order here is the emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedConfig {
    /// Fully qualified JDBC driver class name.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub driver: Option<String>,
    /// Maximum number of connection retries.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub connect_retries: Option<u32>,
    /// Seconds between connection retries.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub connect_retries_interval: Option<u32>,
    /// SQL statements to run on connect.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub init_sql: Option<String>,
    /// Callback classes or script locations.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub callbacks: Option<Vec<String>>,
    /// Encoding of config files.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub config_file_encoding: Option<String>,
    /// Additional Flyway config files.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub config_files: Option<Vec<String>>,
    /// Encoding of SQL migrations (`-encoding`).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub migration_encoding: Option<String>,
    /// Group all pending migrations in one transaction (`-group`).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub group_pending_migrations: Option<bool>,
    /// Recorded "installed by" user in the history table.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub installed_by: Option<String>,
    /// Directories holding extra JDBC drivers.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub jar_dirs: Option<Vec<String>>,
    /// Fail when a migration location is missing (`-failOnMissingLocations`).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fail_on_missing_migration_locations: Option<bool>,
    /// Maximum number of history-table lock retries.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub lock_retry_count: Option<u32>,
    /// Allow mixed transactional and non-transactional statements.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mixed: Option<bool>,
    /// Apply new migrations discovered out of order (`-outOfOrder`).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub apply_new_migrations_out_of_order: Option<bool>,
    /// Skip the default callbacks.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub skip_default_callbacks: Option<bool>,
    /// Skip the default resolvers.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub skip_default_resolvers: Option<bool>,
    /// Name of the schema history table (`-table`).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub schema_history_table: Option<String>,
    /// Tablespace of the schema history table (`-tableSpace`).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub schema_history_table_space: Option<String>,
    /// Target migration version.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target: Option<String>,
    /// Validate migration naming.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub validate_migration_naming: Option<bool>,
    /// Validate on migrate.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub validate_on_migrate: Option<bool>,
    /// Working directory for relative paths.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub working_directory: Option<String>,
    /// Create schemas that do not exist.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub create_schemas: Option<bool>,
    /// Schemas managed by Flyway.
    ///
    /// The default schema, when also listed here, is excluded during
    /// serialization since it is supplied separately.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub schemas: Option<Vec<String>>,
    /// Description of the baseline marker.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub baseline_description: Option<String>,
    /// Baseline on migrate against non-empty schemas.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub baseline_on_migrate: Option<bool>,
    /// Version to tag the baseline with.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub baseline_version: Option<String>,
    /// Disable the clean command.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub clean_disabled: Option<bool>,
    /// Clean schemas when validation fails.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub clean_on_validation_error: Option<bool>,
    /// Migration patterns to ignore during validation.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ignore_migration_patterns: Option<Vec<String>>,
    /// Prefix of repeatable SQL migrations.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub repeatable_sql_migration_prefix: Option<String>,
    /// Custom migration resolvers.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub resolvers: Option<Vec<String>>,
    /// Prefix of versioned SQL migrations.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sql_migration_prefix: Option<String>,
    /// Separator of versioned SQL migrations.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sql_migration_separator: Option<String>,
    /// File suffixes of SQL migrations.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sql_migration_suffixes: Option<Vec<String>>,
    /// Enable placeholder replacement.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub place_holder_replacement: Option<bool>,
    /// Placeholder prefix.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub place_holder_prefix: Option<String>,
    /// Placeholder suffix.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub place_holder_suffix: Option<String>,
    /// Placeholders substituted into migrations, in insertion order.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub place_holders: Option<IndexMap<String, String>>,
    /// Placeholder separator.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub place_holder_separator: Option<String>,
    /// Script placeholder prefix.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub script_place_holder_prefix: Option<String>,
    /// Script placeholder suffix.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub script_place_holder_suffix: Option<String>,
    /// Flyway edition.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub edition: Option<String>,
    /// Use a PostgreSQL advisory transaction lock.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub postgresql_transaction_lock: Option<bool>,
}
