//! Builds typed datasets from raw delimited lines.

use tracing::{debug, info, warn};

use crate::config::{BuildOptions, InferenceConfig, RowPolicy, DELIMITER_SAMPLE_LINES};
use crate::error::{GuapoError, Result};
use crate::inference::TypeSampler;
use crate::input::{split_fields, DelimiterInferer};
use crate::schema::{CellValue, DataType};

use super::table::Dataset;

/// Name given to freshly built datasets until the caller renames them.
pub const UNTITLED: &str = "untitled";

/// Turns raw lines into a [`Dataset`]: delimiter inference, row splitting,
/// per-column type sampling and casting.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    inferer: DelimiterInferer,
    sampler: TypeSampler,
    inference_lines: usize,
}

impl TableBuilder {
    /// Create a builder with the default candidates and sampling limits.
    pub fn new() -> Self {
        Self {
            inferer: DelimiterInferer::new(),
            sampler: TypeSampler::new(),
            inference_lines: DELIMITER_SAMPLE_LINES,
        }
    }

    /// Create a builder from inference settings.
    pub fn from_config(config: &InferenceConfig) -> Self {
        Self {
            inferer: DelimiterInferer::with_candidates(config.candidate_delimiters.clone()),
            sampler: TypeSampler::with_settings(config.sample_size, config.threshold),
            inference_lines: config.inference_lines,
        }
    }

    /// Build a dataset from raw lines.
    ///
    /// A soft delimiter failure still produces a dataset with a single text
    /// column. The `NoDelimiterFound` error travels with it and is available
    /// from [`Dataset::inference_warning`].
    pub fn build<S: AsRef<str>>(&self, lines: &[S], options: &BuildOptions) -> Result<Dataset> {
        if options.has_header && lines.len() < 2 {
            return Err(GuapoError::InsufficientData {
                required: 2,
                found: lines.len(),
            });
        }
        let Some(first) = lines.first() else {
            return Err(GuapoError::InsufficientData {
                required: 1,
                found: 0,
            });
        };

        let sample = &lines[..self.inference_lines.min(lines.len())];
        let inference = self
            .inferer
            .infer(first.as_ref(), sample, options.delimiter.as_deref());
        let delimiter = inference.delimiter;
        let column_count = inference.columns.len();

        let (columns, data_start) = if options.has_header {
            (inference.columns, 1)
        } else {
            ((1..=column_count).map(|i| i.to_string()).collect(), 0)
        };

        let raw_rows = self.split_rows(&lines[data_start..], &delimiter, column_count, data_start, options.row_policy)?;

        // Sample ceiling is bounded by the total number of cells in the table.
        let total_cells = raw_rows.len() * column_count;
        let sample_size = self.sampler.sample_size().min(total_cells.saturating_sub(1));

        let mut column_types = Vec::with_capacity(column_count);
        let mut typed_columns: Vec<Vec<CellValue>> = Vec::with_capacity(column_count);

        for (index, name) in columns.iter().enumerate() {
            let raw: Vec<&str> = raw_rows.iter().map(|row| row[index].as_str()).collect();
            let counts = TypeSampler::classify(&raw, sample_size);
            let inferred = self.sampler.decide(&counts);
            debug!(
                column = %name,
                sampled = counts.sampled,
                integer_hits = counts.integer_hits,
                float_hits = counts.float_hits,
                %inferred,
                "column type sampled"
            );

            let (data_type, values) = cast_with_fallback(name, &raw, inferred);
            column_types.push(data_type);
            typed_columns.push(values);
        }

        let rows = transpose(typed_columns, raw_rows.len());
        let dataset = Dataset::new(UNTITLED, columns, column_types, rows)?
            .with_delimiter(delimiter)
            .with_inference_warning(inference.error);

        info!(
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            delimiter = %dataset.delimiter(),
            "dataset built"
        );

        Ok(dataset)
    }

    fn split_rows<S: AsRef<str>>(
        &self,
        lines: &[S],
        delimiter: &str,
        column_count: usize,
        line_offset: usize,
        policy: RowPolicy,
    ) -> Result<Vec<Vec<String>>> {
        let mut rows = Vec::with_capacity(lines.len());

        for (i, line) in lines.iter().enumerate() {
            let mut fields: Vec<String> = split_fields(line.as_ref(), delimiter)
                .into_iter()
                .map(str::to_string)
                .collect();

            if fields.len() != column_count {
                let line_number = line_offset + i + 1;
                match policy {
                    RowPolicy::Reject => {
                        return Err(GuapoError::RaggedRow {
                            line: line_number,
                            expected: column_count,
                            found: fields.len(),
                        });
                    }
                    RowPolicy::Pad => {
                        warn!(
                            line = line_number,
                            expected = column_count,
                            found = fields.len(),
                            "row length mismatch, padding/truncating"
                        );
                        fields.resize(column_count, String::new());
                    }
                }
            }

            rows.push(fields);
        }

        Ok(rows)
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a dataset with the default builder.
pub fn build<S: AsRef<str>>(lines: &[S], delimiter: Option<&str>, has_header: bool) -> Result<Dataset> {
    let mut options = BuildOptions::new().with_header(has_header);
    options.delimiter = delimiter.map(str::to_string);
    TableBuilder::new().build(lines, &options)
}

/// Cast every raw value to `inferred`, stepping down Integer -> Float -> Text
/// until the whole column converts.
fn cast_with_fallback(name: &str, raw: &[&str], inferred: DataType) -> (DataType, Vec<CellValue>) {
    let mut candidate = inferred;
    loop {
        let converted: Option<Vec<CellValue>> = raw
            .iter()
            .map(|value| CellValue::from(*value).cast(candidate))
            .collect();

        if let Some(values) = converted {
            return (candidate, values);
        }

        let next = match candidate {
            DataType::Integer => DataType::Float,
            _ => DataType::Text,
        };
        warn!(column = %name, from = %candidate, to = %next, "column cast failed, falling back");
        candidate = next;
    }
}

fn transpose(columns: Vec<Vec<CellValue>>, row_count: usize) -> Vec<Vec<CellValue>> {
    let mut rows: Vec<Vec<CellValue>> = (0..row_count)
        .map(|_| Vec::with_capacity(columns.len()))
        .collect();
    for column in columns {
        for (row, value) in rows.iter_mut().zip(column) {
            row.push(value);
        }
    }
    rows
}
