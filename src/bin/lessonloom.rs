//! lessonloom CLI Binary
//!
//! Command-line interface for generating and checking lessons.

use anyhow::Context;
use clap::Parser;
use lessonloom::cli::{map_error, Cli, RunContext};
use lessonloom::config::ConfigLoader;
use lessonloom::logging::{init_logging, LoggingConfig};
use std::process;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli)?;
    init_logging(Some(&logging_config)).context("Failed to initialize logging")?;

    info!(command = cli.command.name(), "lessonloom starting");

    let context = match RunContext::new(cli.workspace.clone(), cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error loading configuration: {}", e);
            eprintln!("{}", e);
            process::exit(2);
        }
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling");
            on_interrupt.cancel();
        }
    });

    match context.execute(&cli.command, &cancel).await {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(e.exit_code());
        }
    }
}

/// Build logging configuration from CLI args, environment, and config file.
fn build_logging_config(cli: &Cli) -> anyhow::Result<LoggingConfig> {
    // Logging stays off unless asked for, so stdout and stderr carry only command output.
    if !cli.verbose && cli.log_level.is_none() {
        return Ok(LoggingConfig {
            level: "off".to_string(),
            ..LoggingConfig::default()
        });
    }

    let loaded = match cli.config {
        Some(ref config_path) => ConfigLoader::load_from_file(config_path),
        None => ConfigLoader::load(&cli.workspace),
    };
    let mut config = loaded.map(|c| c.logging).unwrap_or_default();

    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.parse().context("Invalid --log-format")?;
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.parse().context("Invalid --log-output")?;
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
    }
    Ok(config)
}
