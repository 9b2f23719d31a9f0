//! Apply command - run an operation script and export the result.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

use colored::Colorize;
use guapo::{Dataset, TransformEngine, TransformOperation};

use crate::cli::InputArgs;

use super::load;

pub fn run(
    input: InputArgs,
    script: PathBuf,
    preview_only: bool,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut dataset, metadata, config) = load(&input)?;

    let script_text = fs::read_to_string(&script)
        .map_err(|e| format!("Cannot read script {}: {}", script.display(), e))?;
    let operations = TransformOperation::parse_script(&script_text)?;

    eprintln!(
        "{} {} operation(s) to {}",
        "Applying".cyan().bold(),
        operations.len().to_string().white().bold(),
        metadata.file.white()
    );

    let engine = TransformEngine::with_defaults(config.cleaning.clone());

    if preview_only {
        preview(&engine, &mut dataset, &operations)?;
    } else {
        let result = engine.apply_all(&mut dataset, &operations)?;
        for change in &result.changes {
            eprintln!(
                "  {} {} ({} value(s) changed)",
                "✓".green(),
                change.description,
                change.values_changed
            );
        }
        eprintln!(
            "{} {} operation(s), {} value(s) changed",
            "Done:".green().bold(),
            result.operations_applied,
            result.values_changed
        );
    }

    eprintln!();
    eprintln!("{}", "Operation log:".yellow().bold());
    for (i, entry) in dataset.log().entries().iter().enumerate() {
        eprintln!("  {}. {}", i + 1, entry);
    }

    match output {
        Some(path) => {
            let file = File::create(&path)
                .map_err(|e| format!("Cannot create {}: {}", path.display(), e))?;
            write_table(&dataset, file)?;
            eprintln!("{} {}", "Wrote".green().bold(), path.display());
        }
        None => write_table(&dataset, io::stdout().lock())?,
    }

    Ok(())
}

/// Apply text operations and show numeric ones without committing them.
fn preview(
    engine: &TransformEngine,
    dataset: &mut Dataset,
    operations: &[TransformOperation],
) -> Result<(), Box<dyn std::error::Error>> {
    for operation in operations {
        match engine.preview(dataset, operation)? {
            Some(pending) => {
                let marker = if pending.has_errors() {
                    "!".red()
                } else {
                    "~".yellow()
                };
                eprintln!("  {} {}", marker, pending.message);
                for failure in &pending.errors {
                    eprintln!("      {}", failure.to_string().red());
                }
                let values: Vec<String> = pending.values.iter().map(|v| v.to_string()).collect();
                eprintln!("      pending: [{}]", values.join(", "));
            }
            None => {
                let change = engine.apply(dataset, operation)?;
                eprintln!("  {} {}", "✓".green(), change.description);
            }
        }
    }
    Ok(())
}

/// Write the table as delimited text, reusing the input delimiter when it is
/// a single byte.
fn write_table<W: Write>(dataset: &Dataset, writer: W) -> Result<(), Box<dyn std::error::Error>> {
    let delimiter = match dataset.delimiter().as_bytes() {
        [byte] => *byte,
        _ => b',',
    };

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    csv_writer.write_record(dataset.columns())?;
    for row in dataset.rows() {
        csv_writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    csv_writer.flush()?;
    Ok(())
}
