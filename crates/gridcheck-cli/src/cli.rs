//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Gridcheck: rule-based validation for spreadsheets and delimited files
#[derive(Parser)]
#[command(name = "gridcheck")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show header rows, columns, detected types and default rules
    Inspect {
        /// Path to the data file (xlsx, xls, csv, txt, dat)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Only inspect this sheet
        #[arg(short, long)]
        sheet: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a file against default or supplied column rules
    Validate {
        /// Path to the data file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Only validate this sheet
        #[arg(short, long)]
        sheet: Option<String>,

        /// JSON file mapping column names to rule names (default: inferred rules)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// JSON rule catalog with custom and formula rules
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output the full report as JSON
        #[arg(long)]
        json: bool,

        /// Exit with status 1 when any finding is reported
        #[arg(long)]
        fail_on_errors: bool,
    },

    /// Evaluate one formula rule against a column
    Formula {
        /// Path to the data file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Sheet to evaluate (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Column the formula is attached to
        #[arg(short, long)]
        column: String,

        /// Formula, e.g. "'total' = 'a' + 'b'" or "'score' >= 50"
        #[arg(short, long)]
        formula: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
