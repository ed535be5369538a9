//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use subscout_core::ExportFormat;

/// SubScout - Find the subscriptions hiding in your statements
#[derive(Parser)]
#[command(name = "subscout")]
#[command(about = "Recurring subscription detector and savings calculator", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ~/.config/subscout/config.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect recurring subscriptions in a transaction CSV
    Detect {
        /// CSV file with date,description,amount,category columns
        #[arg(short, long)]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Also list merchants charged only once
        #[arg(long)]
        one_time: bool,

        /// Also list rows that could not be parsed
        #[arg(long)]
        show_skipped: bool,
    },

    /// Calculate savings from cancelling subscriptions
    Savings {
        /// CSV file with date,description,amount,category columns
        #[arg(short, long)]
        file: PathBuf,

        /// Merchant to cancel (exact name, repeatable)
        #[arg(short, long = "cancel", value_name = "MERCHANT")]
        cancel: Vec<String>,
    },

    /// Write the subscription report to a file
    Export {
        /// CSV file with date,description,amount,category columns
        #[arg(short, long)]
        file: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Report format: csv or json
        #[arg(long, default_value = "csv", value_parser = parse_export_format)]
        format: ExportFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

fn parse_export_format(s: &str) -> Result<ExportFormat, String> {
    s.parse::<ExportFormat>()
        .map_err(|e| format!("{} (use csv or json)", e))
}
