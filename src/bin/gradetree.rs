//! Gradetree CLI Binary
//!
//! Command-line interface for editing grading rubrics, recording scores and
//! producing student reports and class summaries.

use anyhow::Context;
use clap::Parser;
use gradetree::logging::{init_logging, LoggingConfig};
use gradetree::tooling::cli::{Cli, CliContext};
use std::process;

/// Fold logging flags into the configured logging section.
fn logging_config(cli: &Cli, configured: &LoggingConfig) -> LoggingConfig {
    let mut logging = configured.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    if let Some(level) = &cli.log_level {
        logging.level = level.clone();
    }
    if let Some(format) = cli.log_format {
        logging.format = format;
    }
    if let Some(output) = cli.log_output {
        logging.output = output;
    }
    if let Some(file) = &cli.log_file {
        logging.file = Some(file.clone());
    }
    logging
}

fn run(cli: Cli) -> anyhow::Result<String> {
    let context = CliContext::new(cli.data_dir.clone(), cli.config.clone())
        .context("Failed to initialize gradebook")?;

    let logging = logging_config(&cli, &context.config().logging);
    init_logging(Some(&logging)).context("Failed to initialize logging")?;

    let context = context.with_format(cli.format);
    Ok(context.execute(&cli.command)?)
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
