//! Search command - list rows whose cell contains a query.

use colored::Colorize;
use guapo::transform;

use crate::cli::InputArgs;

use super::{load, resolve_column};

pub fn run(input: InputArgs, column: String, query: String) -> Result<(), Box<dyn std::error::Error>> {
    let (dataset, _, _) = load(&input)?;
    let index = resolve_column(&dataset, &column)?;
    let matches = transform::search(&dataset, index, &query)?;

    println!(
        "{} {} match(es) for \"{}\" in {}",
        "Search:".cyan().bold(),
        matches.len().to_string().white().bold(),
        query,
        dataset.columns()[index].white()
    );

    if matches.is_empty() {
        return Ok(());
    }

    println!("  {}", dataset.columns().join(" | ").dimmed());
    for row_index in matches {
        let cells: Vec<String> = dataset.rows()[row_index]
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if i == index {
                    cell.to_string().yellow().to_string()
                } else {
                    cell.to_string()
                }
            })
            .collect();
        println!("  {:>4}  {}", row_index, cells.join(" | "));
    }

    Ok(())
}
