//! Inspect command - show how a file was ingested.

use colored::Colorize;
use guapo::{DataFormat, DataType, Dataset, SourceMetadata};
use serde::Serialize;

use crate::cli::InputArgs;

use super::{load, show_delimiter};

#[derive(Serialize)]
struct InspectReport<'a> {
    source: &'a SourceMetadata,
    delimiter: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
    rows: usize,
    columns: Vec<ColumnReport<'a>>,
    preview: &'a [Vec<guapo::CellValue>],
}

#[derive(Serialize)]
struct ColumnReport<'a> {
    index: usize,
    name: &'a str,
    data_type: DataType,
    known_formats: &'static [&'static str],
}

pub fn run(input: InputArgs, rows: usize, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (dataset, metadata, _) = load(&input)?;
    let shown = &dataset.rows()[..rows.min(dataset.row_count())];
    let warning = dataset.inference_warning().map(|w| w.to_string());

    if json_output {
        let report = InspectReport {
            source: &metadata,
            delimiter: dataset.delimiter(),
            warning,
            rows: dataset.row_count(),
            columns: column_reports(&dataset),
            preview: shown,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} {}", "Inspecting".cyan().bold(), metadata.file.white());
    println!(
        "  Delimiter: {}   Rows: {}   Columns: {}",
        show_delimiter(dataset.delimiter()).white().bold(),
        dataset.row_count(),
        dataset.column_count()
    );
    if let Some(warning) = warning {
        println!("  {} {}", "Warning:".yellow().bold(), warning);
    }
    println!();

    println!("{}", "Columns:".yellow().bold());
    for report in column_reports(&dataset) {
        let data_type = match report.data_type {
            DataType::Integer | DataType::Float => report.data_type.to_string().green(),
            _ => report.data_type.to_string().blue(),
        };
        println!("  [{}] {} ({})", report.index, report.name.white().bold(), data_type);
    }
    println!();

    println!("{}", format!("First {} row(s):", shown.len()).yellow().bold());
    println!("  {}", dataset.columns().join(" | ").dimmed());
    for row in shown {
        let cells: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
        println!("  {}", cells.join(" | "));
    }

    Ok(())
}

fn column_reports(dataset: &Dataset) -> Vec<ColumnReport<'_>> {
    dataset
        .columns()
        .iter()
        .zip(dataset.column_types())
        .enumerate()
        .map(|(index, (name, data_type))| ColumnReport {
            index,
            name,
            data_type: *data_type,
            known_formats: DataFormat::known(*data_type),
        })
        .collect()
}
