//! Translation of a [`FlywayConfig`] into command-line option tokens.
//!
//! Each set configuration field becomes one option with a value shape
//! decided at flatten time: a scalar, a comma-joined sequence, or a map
//! expanded into one token per entry. The quote character is picked once
//! per build from the host OS and used for every token.

use crate::config::FlywayConfig;
use crate::platform::Os;
use indexmap::IndexMap;

/// Value shape of one command-line option.
#[derive(Debug, Clone, PartialEq, Eq)]
enum OptionValue {
    /// `-key='value'`
    Scalar(String),
    /// `-key='a,b,c'`
    Sequence(Vec<String>),
    /// `key.entry='value'`, one token per entry, no leading dash.
    Mapping(Vec<(String, String)>),
}

/// One configuration field mapped to its Flyway flag.
#[derive(Debug, Clone)]
struct CommandLineOption {
    key: &'static str,
    value: OptionValue,
}

impl CommandLineOption {
    fn tokens(&self, quote: char) -> Vec<String> {
        match &self.value {
            OptionValue::Scalar(value) => {
                vec![format!("-{}={quote}{value}{quote}", self.key)]
            }
            OptionValue::Sequence(values) => {
                vec![format!("-{}={quote}{}{quote}", self.key, values.join(","))]
            }
            OptionValue::Mapping(entries) => entries
                .iter()
                .map(|(entry, value)| format!("{}.{entry}={quote}{value}{quote}", self.key))
                .collect(),
        }
    }
}

/// The serialized command-line options of one Flyway invocation.
#[derive(Debug, Clone)]
pub struct CommandLineOptions {
    options: Vec<CommandLineOption>,
    quote: char,
}

impl CommandLineOptions {
    /// Serialize a configuration for the given host OS.
    ///
    /// Emission order is fixed: the common fields first, then every set
    /// advanced field in the declared order of
    /// [`AdvancedConfig`](crate::config::AdvancedConfig).
    #[must_use]
    pub fn build(config: &FlywayConfig, os: Os) -> Self {
        Self {
            options: collect_options(config),
            quote: os.quote(),
        }
    }

    /// The individual option tokens, in emission order.
    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        self.options
            .iter()
            .flat_map(|option| option.tokens(self.quote))
            .collect()
    }

    /// All tokens joined into one command fragment.
    #[must_use]
    pub fn to_command_string(&self) -> String {
        self.tokens().join(" ")
    }
}

fn scalar<T: ToString>(options: &mut Vec<CommandLineOption>, key: &'static str, value: Option<&T>) {
    if let Some(value) = value {
        options.push(CommandLineOption {
            key,
            value: OptionValue::Scalar(value.to_string()),
        });
    }
}

fn sequence(options: &mut Vec<CommandLineOption>, key: &'static str, values: Option<&Vec<String>>) {
    if let Some(values) = values {
        options.push(CommandLineOption {
            key,
            value: OptionValue::Sequence(values.clone()),
        });
    }
}

fn mapping(
    options: &mut Vec<CommandLineOption>,
    key: &'static str,
    entries: Option<&IndexMap<String, String>>,
) {
    if let Some(entries) = entries {
        options.push(CommandLineOption {
            key,
            value: OptionValue::Mapping(
                entries
                    .iter()
                    .map(|(entry, value)| (entry.clone(), value.clone()))
                    .collect(),
            ),
        });
    }
}

/// Flatten a configuration into its options, in the fixed declared order.
///
/// This match-per-field listing is the exhaustive field-to-flag table; it is
/// kept in lockstep with the configuration types by construction.
#[allow(clippy::too_many_lines)]
fn collect_options(config: &FlywayConfig) -> Vec<CommandLineOption> {
    let mut options = Vec::new();

    scalar(&mut options, "url", Some(&config.url));
    scalar(&mut options, "user", Some(&config.user));
    scalar(&mut options, "password", config.password.as_ref());
    scalar(&mut options, "defaultSchema", config.default_schema.as_ref());
    sequence(&mut options, "locations", Some(&config.migration_locations));

    let Some(advanced) = &config.advanced else {
        return options;
    };

    // The default schema is supplied separately; drop it from the schema set.
    let schemas = advanced.schemas.as_ref().map(|schemas| {
        schemas
            .iter()
            .filter(|schema| Some(*schema) != config.default_schema.as_ref())
            .cloned()
            .collect::<Vec<_>>()
    });

    scalar(&mut options, "driver", advanced.driver.as_ref());
    scalar(&mut options, "connectRetries", advanced.connect_retries.as_ref());
    scalar(
        &mut options,
        "connectRetriesInterval",
        advanced.connect_retries_interval.as_ref(),
    );
    scalar(&mut options, "initSql", advanced.init_sql.as_ref());
    sequence(&mut options, "callbacks", advanced.callbacks.as_ref());
    scalar(
        &mut options,
        "configFileEncoding",
        advanced.config_file_encoding.as_ref(),
    );
    sequence(&mut options, "configFiles", advanced.config_files.as_ref());
    scalar(&mut options, "encoding", advanced.migration_encoding.as_ref());
    scalar(&mut options, "group", advanced.group_pending_migrations.as_ref());
    scalar(&mut options, "installedBy", advanced.installed_by.as_ref());
    sequence(&mut options, "jarDirs", advanced.jar_dirs.as_ref());
    scalar(
        &mut options,
        "failOnMissingLocations",
        advanced.fail_on_missing_migration_locations.as_ref(),
    );
    scalar(&mut options, "lockRetryCount", advanced.lock_retry_count.as_ref());
    scalar(&mut options, "mixed", advanced.mixed.as_ref());
    scalar(
        &mut options,
        "outOfOrder",
        advanced.apply_new_migrations_out_of_order.as_ref(),
    );
    scalar(
        &mut options,
        "skipDefaultCallbacks",
        advanced.skip_default_callbacks.as_ref(),
    );
    scalar(
        &mut options,
        "skipDefaultResolvers",
        advanced.skip_default_resolvers.as_ref(),
    );
    scalar(&mut options, "table", advanced.schema_history_table.as_ref());
    scalar(
        &mut options,
        "tableSpace",
        advanced.schema_history_table_space.as_ref(),
    );
    scalar(&mut options, "target", advanced.target.as_ref());
    scalar(
        &mut options,
        "validateMigrationNaming",
        advanced.validate_migration_naming.as_ref(),
    );
    scalar(
        &mut options,
        "validateOnMigrate",
        advanced.validate_on_migrate.as_ref(),
    );
    scalar(
        &mut options,
        "workingDirectory",
        advanced.working_directory.as_ref(),
    );
    scalar(&mut options, "createSchemas", advanced.create_schemas.as_ref());
    sequence(&mut options, "schemas", schemas.as_ref());
    scalar(
        &mut options,
        "baselineDescription",
        advanced.baseline_description.as_ref(),
    );
    scalar(
        &mut options,
        "baselineOnMigrate",
        advanced.baseline_on_migrate.as_ref(),
    );
    scalar(&mut options, "baselineVersion", advanced.baseline_version.as_ref());
    scalar(&mut options, "cleanDisabled", advanced.clean_disabled.as_ref());
    scalar(
        &mut options,
        "cleanOnValidationError",
        advanced.clean_on_validation_error.as_ref(),
    );
    sequence(
        &mut options,
        "ignoreMigrationPatterns",
        advanced.ignore_migration_patterns.as_ref(),
    );
    scalar(
        &mut options,
        "repeatableSqlMigrationPrefix",
        advanced.repeatable_sql_migration_prefix.as_ref(),
    );
    sequence(&mut options, "resolvers", advanced.resolvers.as_ref());
    scalar(
        &mut options,
        "sqlMigrationPrefix",
        advanced.sql_migration_prefix.as_ref(),
    );
    scalar(
        &mut options,
        "sqlMigrationSeparator",
        advanced.sql_migration_separator.as_ref(),
    );
    sequence(
        &mut options,
        "sqlMigrationSuffixes",
        advanced.sql_migration_suffixes.as_ref(),
    );
    scalar(
        &mut options,
        "placeHolderReplacement",
        advanced.place_holder_replacement.as_ref(),
    );
    scalar(
        &mut options,
        "placeHolderPrefix",
        advanced.place_holder_prefix.as_ref(),
    );
    scalar(
        &mut options,
        "placeHolderSuffix",
        advanced.place_holder_suffix.as_ref(),
    );
    mapping(&mut options, "placeHolders", advanced.place_holders.as_ref());
    scalar(
        &mut options,
        "placeHolderSeparator",
        advanced.place_holder_separator.as_ref(),
    );
    scalar(
        &mut options,
        "scriptPlaceHolderPrefix",
        advanced.script_place_holder_prefix.as_ref(),
    );
    scalar(
        &mut options,
        "scriptPlaceHolderSuffix",
        advanced.script_place_holder_suffix.as_ref(),
    );
    scalar(&mut options, "edition", advanced.edition.as_ref());
    scalar(
        &mut options,
        "postgresqlTransactionLock",
        advanced.postgresql_transaction_lock.as_ref(),
    );

    options
}
