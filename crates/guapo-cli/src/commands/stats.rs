//! Stats command - distinct values of a text column with their counts.

use colored::Colorize;
use guapo::transform;

use crate::cli::InputArgs;

use super::{load, resolve_column};

pub fn run(input: InputArgs, column: String) -> Result<(), Box<dyn std::error::Error>> {
    let (dataset, _, _) = load(&input)?;
    let index = resolve_column(&dataset, &column)?;
    let stats = transform::word_statistics(&dataset, index)?;

    println!(
        "{} {} distinct value(s) in {}",
        "Stats:".cyan().bold(),
        stats.len().to_string().white().bold(),
        dataset.columns()[index].white()
    );

    let width = stats.unique_values().map(|v| v.chars().count()).max().unwrap_or(0);
    for (value, count) in &stats.counts {
        let shown = if value.is_empty() { "(empty)" } else { value.as_str() };
        println!("  {:<width$}  {}", shown, count.to_string().green(), width = width.max(7));
    }

    Ok(())
}
