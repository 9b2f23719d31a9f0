//! CLI command implementations.

pub mod apply;
pub mod inspect;
pub mod search;
pub mod stats;

use std::error::Error;

use guapo::{BuildOptions, Dataset, GuapoConfig, SourceMetadata, Session};
use tracing::debug;

use crate::cli::InputArgs;

/// Read and build the input file. Command-line flags override the
/// configuration file's build options.
pub fn load(input: &InputArgs) -> Result<(Dataset, SourceMetadata, GuapoConfig), Box<dyn Error>> {
    let mut config = match &input.config {
        Some(path) => GuapoConfig::load(path)?,
        None => GuapoConfig::new(),
    };
    config.build = build_options(input, &config.build);

    let mut session = Session::with_config(config.clone());
    let (index, metadata) = session.open_file(&input.file)?;
    let dataset = session.remove(index)?;
    debug!(
        file = %input.file.display(),
        delimiter = dataset.delimiter(),
        rows = dataset.row_count(),
        "Loaded input"
    );
    Ok((dataset, metadata, config))
}

fn build_options(input: &InputArgs, base: &BuildOptions) -> BuildOptions {
    let mut options = base.clone();
    if let Some(delimiter) = &input.delimiter {
        options = options.with_delimiter(unescape(delimiter));
    }
    if input.no_header {
        options = options.with_header(false);
    }
    options
}

/// Accept `\t` for tab on the command line.
fn unescape(delimiter: &str) -> String {
    match delimiter {
        "\\t" | "tab" => "\t".to_string(),
        other => other.to_string(),
    }
}

/// Resolve a column given as an index or a name.
pub fn resolve_column(dataset: &Dataset, column: &str) -> Result<usize, Box<dyn Error>> {
    if let Ok(index) = column.parse::<usize>() {
        dataset.check_column(index)?;
        return Ok(index);
    }
    dataset
        .column_index(column)
        .ok_or_else(|| format!("Column '{}' not found. Columns: {}", column, dataset.columns().join(", ")).into())
}

/// Printable form of a delimiter.
pub fn show_delimiter(delimiter: &str) -> String {
    match delimiter {
        "" => "(none)".to_string(),
        "\t" => "\\t".to_string(),
        " " => "(space)".to_string(),
        other => format!("'{}'", other),
    }
}
