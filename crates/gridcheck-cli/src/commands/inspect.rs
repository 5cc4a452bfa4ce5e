//! Inspect command - show how a file would be read and which rules it would get.

use std::path::PathBuf;

use colored::Colorize;
use gridcheck::Gridcheck;

use super::{CommandResult, select_sheets};

pub fn run(file: PathBuf, sheet: Option<String>, json_output: bool) -> CommandResult {
    let gridcheck = Gridcheck::new();
    let (workbook, source) = gridcheck.load(&file)?;

    let mut sheets = Vec::new();
    for sheet in select_sheets(&workbook, sheet.as_deref())? {
        let (frame, header_row) = gridcheck.prepare(sheet)?;
        let columns = gridcheck.profile_columns(&frame);
        sheets.push((sheet.name.clone(), header_row, frame.row_count(), columns));
    }

    if json_output {
        let sheets: Vec<_> = sheets
            .iter()
            .map(|(name, header_row, rows, columns)| {
                serde_json::json!({
                    "sheet": name,
                    "header_row": header_row,
                    "rows": rows,
                    "columns": columns,
                })
            })
            .collect();
        let output = serde_json::json!({ "source": source, "sheets": sheets });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(0);
    }

    println!("{} {}", "Inspecting".cyan().bold(), source.file.white());
    println!("  Format: {}", source.format);
    if let Some(delimiter) = source.delimiter {
        println!("  Delimiter: {:?}", delimiter);
    }
    println!("  Hash: {}", source.hash.dimmed());

    for (name, header_row, rows, columns) in &sheets {
        println!();
        println!(
            "{} {} (header row {}, {} data rows)",
            "Sheet".yellow().bold(),
            name.white().bold(),
            header_row + 1,
            rows
        );

        for column in columns {
            println!(
                "  {:<24} {:<13} nulls {:>5.1}%  rules: {}",
                column.name,
                column.detected_type.to_string().cyan(),
                column.null_percentage(),
                column.default_rules.join(", ")
            );
            if !column.sample_values.is_empty() {
                println!("  {:<24} {}", "", column.sample_values.join(", ").dimmed());
            }
        }
    }

    Ok(0)
}
