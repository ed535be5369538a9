//! SubScout CLI - Recurring subscription detector
//!
//! Usage:
//!   subscout detect --file tx.csv                 List detected subscriptions
//!   subscout savings --file tx.csv --cancel Hulu  What-if savings
//!   subscout export --file tx.csv --output r.csv  Write the report

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Detect {
            file,
            format,
            one_time,
            show_skipped,
        } => commands::cmd_detect(config_path, &file, format, one_time, show_skipped),
        Commands::Savings { file, cancel } => commands::cmd_savings(config_path, &file, &cancel),
        Commands::Export {
            file,
            output,
            format,
        } => commands::cmd_export(config_path, &file, &output, format),
    }
}
