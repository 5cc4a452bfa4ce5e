//! Validate command - run column rules and report findings.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use colored::Colorize;
use gridcheck::{ColumnRules, Gridcheck, GridcheckConfig, GridcheckError, InMemoryCatalog};
use tracing::info;

use super::{CommandResult, format_location};

/// Arguments of the validate command.
pub struct ValidateArgs {
    pub file: PathBuf,
    pub sheet: Option<String>,
    pub rules: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub fail_on_errors: bool,
}

pub fn run(args: ValidateArgs) -> CommandResult {
    let config = match &args.config {
        Some(path) => GridcheckConfig::load(path)?,
        None => GridcheckConfig::default(),
    };

    let mut gridcheck = Gridcheck::with_config(config);
    if let Some(path) = &args.catalog {
        let mut catalog = InMemoryCatalog::with_defaults();
        catalog.extend(InMemoryCatalog::load(path)?.iter().cloned());
        info!(path = %path.display(), rules = catalog.len(), "Loaded rule catalog");
        gridcheck = gridcheck.with_catalog(catalog);
    }

    let rules = args.rules.as_ref().map(load_rules).transpose()?;
    let report = gridcheck.check_file(&args.file, rules.as_ref(), args.sheet.as_deref())?;

    let failed = args.fail_on_errors && !report.is_valid();
    let code = if failed { 1 } else { 0 };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(code);
    }

    println!("{} {}", "Validating".cyan().bold(), report.source.file.white());

    for sheet in &report.sheets {
        println!();
        println!(
            "{} {} ({} rows, {} rule checks)",
            "Sheet".yellow().bold(),
            sheet.sheet.white().bold(),
            sheet.report.row_count,
            sheet.report.rules_checked
        );

        if sheet.report.is_valid() {
            println!("  {}", "No errors found".green());
            continue;
        }

        for (column, locations) in &sheet.report.errors {
            println!("  {} ({})", column.bold(), locations.len().to_string().red());
            for location in locations {
                println!("    {}", format_location(location));
            }
        }
    }

    println!();
    let total = report.total_errors();
    if total == 0 {
        println!("{}", "All checks passed".green().bold());
    } else {
        println!("{} {}", total.to_string().red().bold(), "errors found".red());
    }

    Ok(code)
}

fn load_rules(path: &PathBuf) -> gridcheck::Result<ColumnRules> {
    let file = File::open(path).map_err(|e| {
        GridcheckError::Config(format!("Cannot open rules file '{}': {}", path.display(), e))
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        GridcheckError::Config(format!("Invalid rules file '{}': {}", path.display(), e))
    })
}
