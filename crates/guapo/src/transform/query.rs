//! Read-only queries over text columns. Queries are not logged.

use indexmap::IndexMap;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::Result;
use crate::schema::DataType;

/// Distinct values of a column and how often each occurs as a substring
/// anywhere in the column.
///
/// Counts are substring matches, so a value that is contained in another
/// value is also counted inside it. The empty value matches at every
/// character boundary of every cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordStatistics {
    /// Distinct values in first-seen order, with their match counts.
    pub counts: IndexMap<String, usize>,
}

impl WordStatistics {
    /// Distinct values in first-seen order.
    pub fn unique_values(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Match count for one value.
    pub fn count(&self, value: &str) -> Option<usize> {
        self.counts.get(value).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Collect the distinct values of a text column with their substring counts.
pub fn word_statistics(dataset: &Dataset, column: usize) -> Result<WordStatistics> {
    dataset.require_type("word_statistics", column, &[DataType::Text])?;

    let cells: Vec<&str> = text_cells(dataset, column);
    let mut counts: IndexMap<String, usize> = IndexMap::new();

    for cell in &cells {
        if counts.contains_key(*cell) {
            continue;
        }
        let total = cells.iter().map(|c| c.matches(*cell).count()).sum();
        counts.insert(cell.to_string(), total);
    }

    Ok(WordStatistics { counts })
}

/// Row indices whose cell contains `query`, ignoring case. The query is
/// matched literally.
pub fn search(dataset: &Dataset, column: usize, query: &str) -> Result<Vec<usize>> {
    dataset.require_type("search", column, &[DataType::Text])?;

    let pattern = RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()?;

    Ok(text_cells(dataset, column)
        .into_iter()
        .enumerate()
        .filter(|(_, cell)| pattern.is_match(cell))
        .map(|(row, _)| row)
        .collect())
}

fn text_cells(dataset: &Dataset, column: usize) -> Vec<&str> {
    dataset
        .rows()
        .iter()
        .map(|row| row[column].as_text().unwrap_or_default())
        .collect()
}
