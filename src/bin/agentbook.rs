//! agentbook CLI Binary
//!
//! Command-line interface for maintaining agent configurations and their backups.

use agentbook::config::{AppConfig, ConfigLoader};
use agentbook::error::ApiError;
use agentbook::logging::init_logging;
use agentbook::tooling::cli::{Cli, CliContext};
use clap::Parser;
use std::process;

fn load_config(cli: &Cli) -> Result<AppConfig, ApiError> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load(&cli.workspace)?,
    };

    // CLI logging flags override the configured values
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }
    if let Some(output) = &cli.log_output {
        config.logging.output = output.clone();
    }
    if let Some(file) = &cli.log_file {
        config.logging.file = Some(file.clone());
    }
    Ok(config)
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(Some(&config.logging)) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let context = match CliContext::with_config(cli.workspace.clone(), config) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error initializing workspace: {}", e);
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
