//! `flyway-rs` binary: run Flyway commands with a version-pinned CLI.

// The binary writes results to stdout/stderr directly.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::Parser;
use flyway::cli::{Cli, CliError, Commands, EXIT_FLYWAY_FAILED, EXIT_OK, exit_code_for};
use flyway::{Flyway, FlywayOptions};
use flyway_provider::FlywayCliStrategy;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over the --level flag when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.level.directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let exit_code = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime.block_on(run(cli)),
        Err(e) => {
            eprintln!("fatal: failed to create tokio runtime: {e}");
            EXIT_FLYWAY_FAILED
        }
    };
    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> i32 {
    match execute(cli).await {
        Ok(success) => {
            if success {
                EXIT_OK
            } else {
                EXIT_FLYWAY_FAILED
            }
        }
        Err(error) => {
            let code = exit_code_for(&error);
            eprintln!("{:?}", miette::Report::new(error));
            code
        }
    }
}

/// Run the requested command; the returned flag is Flyway's own verdict.
async fn execute(cli: Cli) -> Result<bool, CliError> {
    let config = cli.build_config()?;

    let mut options = FlywayOptions::default();
    if let Some(version) = &cli.flyway_version {
        options = options.with_version(version.clone());
    }
    if let Some(strategy) = &cli.strategy {
        options = options.with_strategy(FlywayCliStrategy::parse(strategy));
    }
    if let Some(directory) = &cli.cli_directory {
        options = options.with_cli_directory(directory.clone());
    }

    let flyway = Flyway::with_options(config, options);
    let response = match cli.command {
        Commands::Migrate => flyway.migrate(None).await?,
        Commands::Clean => flyway.clean(None).await?,
        Commands::Info => flyway.info(None).await?,
        Commands::Validate => flyway.validate(None).await?,
        Commands::Repair => flyway.repair(None).await?,
    };

    if !response.stdout.is_empty() {
        println!("{}", response.stdout.trim_end());
    }
    if !response.success && !response.stderr.is_empty() {
        eprintln!("{}", response.stderr.trim_end());
    }

    Ok(response.success)
}
