//! Formula command - evaluate a single formula rule.

use std::path::PathBuf;

use colored::Colorize;
use gridcheck::{Gridcheck, GridcheckError};

use super::{CommandResult, format_location};

pub fn run(
    file: PathBuf,
    sheet: Option<String>,
    column: String,
    formula: String,
    json_output: bool,
) -> CommandResult {
    let gridcheck = Gridcheck::new();
    let (workbook, _) = gridcheck.load(&file)?;

    let sheet = match sheet.as_deref() {
        Some(name) => workbook.get(name),
        None => workbook.values().next(),
    }
    .ok_or_else(|| GridcheckError::SheetNotFound(sheet.clone().unwrap_or_default()))?;

    let (frame, _) = gridcheck.prepare(sheet)?;
    let outcome = gridcheck.evaluate_formula(&frame, &column, &formula);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(0);
    }

    println!("{} {}", "Formula".cyan().bold(), formula.white());
    if outcome.valid {
        println!("  {}", "Passed on every row".green());
        return Ok(0);
    }

    for location in &outcome.locations {
        println!("  {}", format_location(location));
    }
    println!(
        "{} {}",
        outcome.locations.len().to_string().red().bold(),
        "errors found".red()
    );
    Ok(0)
}
