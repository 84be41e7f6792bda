// Command-line interface
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "eu-fossil-generation", about = "EU fossil generation and CO2 estimate pipeline")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download data newer than the dataset and merge it in
    Update {
        /// Re-fetch every country from this date (YYYY-MM-DD), ignoring the history
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last date to ingest (YYYY-MM-DD), defaults to yesterday
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Dataset CSV to update
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Report zero runs and missing dates in the stored dataset
    Validate {
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Compute daily CO2 estimates from the dataset
    Emissions {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Compare a year's tracked generation against EU-wide totals
    Coverage {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        input: Option<PathBuf>,
    },
}
