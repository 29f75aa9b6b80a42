use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod adapter;
mod cli;
mod commands;
mod config;
mod error;
mod ident;
mod reconcile;
mod remote;

use cli::{Cli, Commands, OutputFormat};
use commands::apply::ApplyOptions;
use commands::delete::DeleteTarget;
use config::{Config, LogLevel};

fn setup_logging(log_level: LogLevel) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("orgcfg")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("orgcfg.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(log_level.to_level_filter());
    }

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    info!(
        "Log level: {} (from {})",
        log_level.as_filter(),
        if std::env::var("RUST_LOG").is_ok() { "RUST_LOG env" } else { "config" }
    );
    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<()> {
    let quiet = cli.quiet;

    match cli.command {
        Commands::Read { identity, format } => commands::read::run(identity, OutputFormat::resolve(format), &config),
        Commands::Apply {
            identity,
            data,
            file,
            fragment,
            id,
            format,
        } => commands::apply::run(
            ApplyOptions {
                identity,
                data,
                file,
                fragment,
                id,
                format: OutputFormat::resolve(format),
                quiet,
            },
            &config,
        ),
        Commands::Delete {
            id,
            org,
            provider_key,
            name,
        } => {
            let target = match (id, provider_key, name) {
                (Some(id), _, _) => DeleteTarget::Composite(id),
                (None, Some(provider_key), Some(name)) => DeleteTarget::Identity {
                    org,
                    provider_key,
                    name,
                },
                _ => eyre::bail!("Pass --id, or --provider-key and --name"),
            };
            commands::delete::run(target, quiet, &config)
        }
        Commands::Sync { state, delete } => commands::sync::run(state, delete, quiet, &config),
        Commands::Id { action } => commands::id::run(action),
        Commands::Config { action } => commands::config::run(action, &config),
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments first
    let cli = Cli::parse();

    // Load configuration (before logging, so log messages in Config::load are silent)
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    let log_level = if cli.verbose { LogLevel::Debug } else { config.log_level };
    setup_logging(log_level).context("Failed to setup logging")?;

    info!("Starting orgcfg with config from: {:?}", cli.config);

    run(cli, config).context("Command failed")?;

    Ok(())
}
