//! FitCalc command-line entry point

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use fitcalc_cli::cli::Cli;
use fitcalc_cli::commands::{self, Output};
use fitcalc_cli::config::{AppConfig, LogFormat, LoggingConfig};
use fitcalc_cli::error::{CliError, CliResult};
use fitcalc_cli::storage::FileStore;
use fitcalc_shared::{KeyValueStore, MemoryStore, Session};
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    init_tracing(&config.logging, cli.verbose);

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        production = AppConfig::is_production(),
        "Starting FitCalc"
    );

    let store_enabled = config.storage.enabled && !cli.no_store;
    let store_path = cli.store.clone().or_else(|| config.storage.resolved_path());

    let outcome = match (store_enabled, store_path) {
        (true, Some(path)) => run(&cli, &config, Session::new(open_store(path))),
        (true, None) => {
            warn!("No data directory available, values will not be remembered");
            run(&cli, &config, Session::new(MemoryStore::new()))
        }
        (false, _) => run(&cli, &config, Session::new(MemoryStore::new())),
    };

    match outcome {
        Ok(output) => {
            print_output(&cli, &output)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report_error(&cli, &err);
            Ok(ExitCode::from(err.exit_code()))
        }
    }
}

/// Open the preference file, starting over when it cannot be read
fn open_store(path: PathBuf) -> FileStore {
    match FileStore::open(&path) {
        Ok(store) => store,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable preference file");
            FileStore::empty(path)
        }
    }
}

fn run<S: KeyValueStore>(cli: &Cli, config: &AppConfig, mut session: Session<S>) -> CliResult<Output> {
    session.ensure_unit_system(config.defaults.unit_system)?;
    if let Some(unit) = cli.unit {
        session.set_unit_system(unit)?;
    }
    commands::execute(&cli.command, &mut session, &config.defaults)
}

fn print_output(cli: &Cli, output: &Output) -> Result<()> {
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output.json)?);
    } else {
        println!("{}", output.text);
    }
    Ok(())
}

fn report_error(cli: &Cli, err: &CliError) {
    let response = err.to_response();
    if cli.json {
        match serde_json::to_string_pretty(&response) {
            Ok(json) => println!("{}", json),
            Err(_) => eprintln!("error: {}", response.error.message),
        }
    } else {
        eprintln!("error: {}", response.error.message);
    }
}

/// Initialize tracing/logging
fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            "fitcalc=debug".into()
        } else {
            logging.filter.as_str().into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match logging.format {
        LogFormat::Json => subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => subscriber
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init(),
    }
}
