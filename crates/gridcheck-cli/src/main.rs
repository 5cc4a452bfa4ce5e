//! Gridcheck CLI - validate spreadsheets and delimited files against column rules.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Inspect { file, sheet, json } => commands::inspect::run(file, sheet, json),

        Commands::Validate {
            file,
            sheet,
            rules,
            catalog,
            config,
            json,
            fail_on_errors,
        } => commands::validate::run(commands::validate::ValidateArgs {
            file,
            sheet,
            rules,
            catalog,
            config,
            json,
            fail_on_errors,
        }),

        Commands::Formula {
            file,
            sheet,
            column,
            formula,
            json,
        } => commands::formula::run(file, sheet, column, formula, json),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
