//! The in-memory typed table.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::error::{GuapoError, Result};
use crate::schema::{CellValue, DataFormat, DataType};
use crate::transform::{OperationKind, OperationLog, OperationLogEntry, TransformChange};

/// One imported, typed, in-memory table with its own operation log.
///
/// Column names and count are fixed after creation. Cell contents, column
/// types and the log change only through the operators, which keep every
/// cell of column `i` consistent with `column_types()[i]`.
///
/// Deserialisation goes through the same checks as [`Dataset::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DatasetRepr")]
pub struct Dataset {
    name: String,
    columns: Vec<String>,
    column_types: Vec<DataType>,
    column_formats: Vec<Option<DataFormat>>,
    rows: Vec<Vec<CellValue>>,
    delimiter: String,
    log: OperationLog,
    #[serde(skip_serializing_if = "Option::is_none")]
    unsplit_candidates: Option<Vec<String>>,
}

/// Unchecked wire form of a [`Dataset`].
#[derive(Deserialize)]
struct DatasetRepr {
    name: String,
    columns: Vec<String>,
    column_types: Vec<DataType>,
    #[serde(default)]
    column_formats: Option<Vec<Option<DataFormat>>>,
    rows: Vec<Vec<CellValue>>,
    #[serde(default)]
    delimiter: String,
    #[serde(default)]
    log: OperationLog,
    #[serde(default)]
    unsplit_candidates: Option<Vec<String>>,
}

impl TryFrom<DatasetRepr> for Dataset {
    type Error = GuapoError;

    fn try_from(repr: DatasetRepr) -> Result<Self> {
        let mut dataset = Dataset::new(repr.name, repr.columns, repr.column_types, repr.rows)?;
        let width = dataset.column_count();

        if let Some(formats) = repr.column_formats {
            if formats.len() != width {
                return Err(GuapoError::Config(format!(
                    "{} column format(s) for {} column(s)",
                    formats.len(),
                    width
                )));
            }
            dataset.column_formats = formats;
        }

        if let Some(entry) = repr.log.entries().iter().find(|e| e.column_index >= width) {
            return Err(GuapoError::IndexOutOfRange {
                kind: "column",
                index: entry.column_index,
                len: width,
            });
        }

        dataset.delimiter = repr.delimiter;
        dataset.log = repr.log;
        dataset.unsplit_candidates = repr.unsplit_candidates;
        Ok(dataset)
    }
}

/// Read-only view of one column.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    dataset: &'a Dataset,
    index: usize,
}

impl<'a> Column<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &'a str {
        &self.dataset.columns[self.index]
    }

    pub fn data_type(&self) -> DataType {
        self.dataset.column_types[self.index]
    }

    pub fn format(&self) -> Option<&'a DataFormat> {
        self.dataset.column_formats[self.index].as_ref()
    }

    /// Cell values top to bottom.
    pub fn values(&self) -> impl Iterator<Item = &'a CellValue> + 'a {
        let index = self.index;
        self.dataset.rows.iter().map(move |row| &row[index])
    }
}

impl Dataset {
    /// Create a dataset, checking that names, types and rows line up and that
    /// every cell matches its column's declared type.
    pub fn new(
        name: impl Into<String>,
        columns: Vec<String>,
        column_types: Vec<DataType>,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<Self> {
        let width = columns.len();
        if column_types.len() != width {
            return Err(GuapoError::Config(format!(
                "{} column type(s) for {} column(s)",
                column_types.len(),
                width
            )));
        }

        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GuapoError::RaggedRow {
                    line: row_idx + 1,
                    expected: width,
                    found: row.len(),
                });
            }
            for (col_idx, cell) in row.iter().enumerate() {
                if cell.data_type() != column_types[col_idx] {
                    return Err(GuapoError::WrongColumnType {
                        operation: "create_dataset".to_string(),
                        column: columns[col_idx].clone(),
                        index: col_idx,
                        expected: column_types[col_idx].to_string(),
                        actual: cell.data_type(),
                    });
                }
            }
        }

        Ok(Self {
            name: name.into(),
            column_formats: vec![None; width],
            columns,
            column_types,
            rows,
            delimiter: String::new(),
            log: OperationLog::new(),
            unsplit_candidates: None,
        })
    }

    pub(crate) fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Keep the soft failure of delimiter inference alongside the data.
    pub(crate) fn with_inference_warning(mut self, warning: Option<GuapoError>) -> Self {
        if let Some(GuapoError::NoDelimiterFound { candidates }) = warning {
            self.unsplit_candidates = Some(candidates);
        }
        self
    }

    /// Display label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Change the display label.
    pub fn rename(&mut self, new_name: impl Into<String>) {
        self.name = new_name.into();
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Declared types, index-aligned with `columns()`.
    pub fn column_types(&self) -> &[DataType] {
        &self.column_types
    }

    /// Optional formats, index-aligned with `columns()`.
    pub fn column_formats(&self) -> &[Option<DataFormat>] {
        &self.column_formats
    }

    /// Row data, each row `column_count()` cells wide.
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Delimiter the dataset was split on (empty if none was found).
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// The soft error from ingestion, if any. `NoDelimiterFound` means no
    /// candidate split the sample consistently and each line was kept as a
    /// single column.
    pub fn inference_warning(&self) -> Option<GuapoError> {
        self.unsplit_candidates
            .as_ref()
            .map(|candidates| GuapoError::NoDelimiterFound {
                candidates: candidates.clone(),
            })
    }

    /// Applied operations, oldest first.
    pub fn log(&self) -> &OperationLog {
        &self.log
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check a column index.
    pub fn check_column(&self, index: usize) -> Result<()> {
        if index < self.columns.len() {
            Ok(())
        } else {
            Err(GuapoError::IndexOutOfRange {
                kind: "column",
                index,
                len: self.columns.len(),
            })
        }
    }

    /// Declared type of a column.
    pub fn column_type(&self, index: usize) -> Result<DataType> {
        self.check_column(index)?;
        Ok(self.column_types[index])
    }

    /// Name of a column.
    pub fn column_name(&self, index: usize) -> Result<&str> {
        self.check_column(index)?;
        Ok(&self.columns[index])
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// View of one column.
    pub fn column(&self, index: usize) -> Result<Column<'_>> {
        self.check_column(index)?;
        Ok(Column {
            dataset: self,
            index,
        })
    }

    /// Get a specific cell.
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Set the display/parsing format of a column.
    pub fn set_column_format(&mut self, index: usize, format: Option<DataFormat>) -> Result<()> {
        self.check_column(index)?;
        self.column_formats[index] = format;
        Ok(())
    }

    /// Re-type a column, converting every cell.
    ///
    /// Converting to text always succeeds. Converting to a numeric type
    /// succeeds only if every cell converts, otherwise nothing changes.
    /// Types without an implementation are rejected.
    pub fn cast_column(
        &mut self,
        index: usize,
        target: DataType,
        format: Option<DataFormat>,
    ) -> Result<TransformChange> {
        let current = self.column_type(index)?;
        let operation = OperationKind::CastColumn;

        if !target.is_supported() {
            return Err(GuapoError::invalid_option(operation.label(), target.label()));
        }

        let converted: Option<Vec<CellValue>> = self
            .rows
            .iter()
            .map(|row| row[index].cast(target))
            .collect();
        let converted = converted.ok_or_else(|| GuapoError::WrongColumnType {
            operation: operation.label().to_string(),
            column: self.columns[index].clone(),
            index,
            expected: target.to_string(),
            actual: current,
        })?;

        let values_changed = self.replace_column(index, converted);
        self.column_types[index] = target;
        self.column_formats[index] = format.clone();

        let description = format!(
            "Cast '{}' from {} to {}",
            self.columns[index], current, target
        );
        self.record(OperationLogEntry::new(
            operation,
            self.columns[index].clone(),
            index,
            json!({
                "from": current,
                "to": target,
                "format": format,
            }),
        ));
        info!(dataset = %self.name, column = index, %description, "cast column");

        Ok(TransformChange {
            kind: operation,
            description,
            column: self.columns[index].clone(),
            column_index: index,
            values_changed,
        })
    }

    /// Fail with `WrongColumnType` unless the column is declared as one of
    /// `accepted` and all of its cells hold that type.
    pub(crate) fn require_type(
        &self,
        operation: &str,
        index: usize,
        accepted: &[DataType],
    ) -> Result<DataType> {
        let declared = self.column_type(index)?;
        let wrong = || GuapoError::WrongColumnType {
            operation: operation.to_string(),
            column: self.columns[index].clone(),
            index,
            expected: accepted
                .iter()
                .map(|t| t.label())
                .collect::<Vec<_>>()
                .join(" or "),
            actual: declared,
        };

        if !accepted.contains(&declared) {
            return Err(wrong());
        }
        if self.rows.iter().any(|row| row[index].data_type() != declared) {
            return Err(wrong());
        }
        Ok(declared)
    }

    /// Replace a column's cells, returning how many differ from before.
    pub(crate) fn replace_column(&mut self, index: usize, values: Vec<CellValue>) -> usize {
        let mut changed = 0;
        for (row, value) in self.rows.iter_mut().zip(values) {
            if row[index] != value {
                changed += 1;
            }
            row[index] = value;
        }
        changed
    }

    pub(crate) fn record(&mut self, entry: OperationLogEntry) {
        self.log.append(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(
            "cities",
            vec!["City".to_string(), "Pop".to_string()],
            vec![DataType::Text, DataType::Integer],
            vec![
                vec![CellValue::from("Rio"), CellValue::Integer(6)],
                vec![CellValue::from("Lima"), CellValue::Integer(10)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_mismatched_cells() {
        let err = Dataset::new(
            "bad",
            vec!["A".to_string()],
            vec![DataType::Integer],
            vec![vec![CellValue::from("x")]],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GuapoError::WrongColumnType {
                ref expected,
                actual: DataType::Text,
                ..
            } if expected == "integer"
        ));

        let err = Dataset::new(
            "bad",
            vec!["A".to_string(), "B".to_string()],
            vec![DataType::Text, DataType::Text],
            vec![vec![CellValue::from("x")]],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GuapoError::RaggedRow {
                line: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_serde_round_trip_keeps_log_and_formats() {
        let mut ds = sample();
        ds.cast_column(1, DataType::Float, Some(DataFormat::new("0.0")))
            .unwrap();

        let json = serde_json::to_string(&ds).unwrap();
        let restored: Dataset = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, ds);
        assert!(restored.inference_warning().is_none());
    }

    #[test]
    fn test_deserialize_rejects_ragged_and_mistyped_rows() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["rows"][1] = serde_json::json!(["only"]);
        let err = serde_json::from_value::<Dataset>(value).unwrap_err();
        assert!(err.to_string().contains("field(s), expected 2"));

        let mut value = serde_json::to_value(sample()).unwrap();
        value["rows"][0][1] = serde_json::json!("six");
        assert!(serde_json::from_value::<Dataset>(value).is_err());

        let mut value = serde_json::to_value(sample()).unwrap();
        value["column_formats"] = serde_json::json!([null]);
        assert!(serde_json::from_value::<Dataset>(value).is_err());
    }

    #[test]
    fn test_accessors() {
        let mut ds = sample();
        assert_eq!(ds.column_count(), 2);
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.column_type(1).unwrap(), DataType::Integer);
        assert_eq!(ds.column_index("Pop"), Some(1));
        assert!(matches!(
            ds.column_type(5),
            Err(GuapoError::IndexOutOfRange { index: 5, len: 2, .. })
        ));

        let column = ds.column(0).unwrap();
        let names: Vec<String> = column.values().map(|v| v.to_string()).collect();
        assert_eq!(names, vec!["Rio", "Lima"]);

        ds.rename("capitals");
        assert_eq!(ds.name(), "capitals");
    }

    #[test]
    fn test_cast_column_to_float_and_text() {
        let mut ds = sample();
        let change = ds
            .cast_column(1, DataType::Float, Some(DataFormat::new("0.0")))
            .unwrap();
        assert_eq!(change.values_changed, 2);
        assert_eq!(ds.column_type(1).unwrap(), DataType::Float);
        assert_eq!(ds.get(0, 1), Some(&CellValue::Float(6.0)));
        assert_eq!(ds.column_formats()[1].as_ref().unwrap().as_str(), "0.0");

        ds.cast_column(1, DataType::Text, None).unwrap();
        assert_eq!(ds.get(1, 1), Some(&CellValue::from("10.0")));
        assert_eq!(ds.log().len(), 2);
    }

    #[test]
    fn test_cast_column_failure_leaves_column() {
        let mut ds = sample();
        let before = ds.clone();
        let err = ds.cast_column(0, DataType::Integer, None).unwrap_err();
        assert!(matches!(err, GuapoError::WrongColumnType { .. }));
        assert_eq!(ds, before);

        let err = ds.cast_column(0, DataType::Date, None).unwrap_err();
        assert!(matches!(err, GuapoError::InvalidOption { .. }));
        assert_eq!(ds, before);
    }
}
