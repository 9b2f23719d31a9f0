//! Numeric operators with a two-step preview/commit flow.
//!
//! [`arithmetic`] and [`clamp`] only read the dataset. They return a
//! [`NumericPreview`] holding the pending result series, any per-cell
//! failures and a message for the user. Nothing changes until the caller
//! passes the preview to [`commit`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::error::{CellError, GuapoError, Result};
use crate::schema::{float_to_integer, CellValue, DataType};

use super::log::{OperationKind, OperationLogEntry};
use super::operations::{ArithmeticOp, TransformChange};

const NUMERIC_TYPES: &[DataType] = &[DataType::Integer, DataType::Float];

const OUT_OF_RANGE: &str = "result out of integer range";

/// A computed but not yet committed numeric transformation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericPreview {
    /// Operation that produced the series.
    pub kind: OperationKind,
    /// Target column index.
    pub column_index: usize,
    /// Target column name.
    pub column_name: String,
    /// Column type the series was computed for. Kept on commit.
    pub data_type: DataType,
    /// Operator parameters, as they will be logged.
    pub parameters: Value,
    /// Pending values, one per row. Rows listed in `errors` keep their
    /// original value here.
    pub values: Vec<CellValue>,
    /// Cells that could not be computed.
    pub errors: Vec<CellError>,
    /// Summary for display.
    pub message: String,
    /// Length of the dataset's operation log when the preview was computed.
    pub log_position: usize,
}

impl NumericPreview {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Compute `x <op> operand` for every cell of a numeric column.
///
/// Integer columns stay integer. With a whole operand, add, subtract,
/// multiply, divide and non-negative powers use exact `i64` arithmetic, with
/// quotients rounded half away from zero. Log, exp, root and fractional
/// operands are computed in floating point and rounded, so they are exact
/// only up to 2^53. Float columns keep full precision.
pub fn arithmetic(
    dataset: &Dataset,
    column: usize,
    operation: ArithmeticOp,
    operand: f64,
) -> Result<NumericPreview> {
    let kind = OperationKind::Arithmetic;
    let data_type = dataset.require_type(kind.label(), column, NUMERIC_TYPES)?;
    if !operand.is_finite() {
        return Err(GuapoError::invalid_option(
            kind.label(),
            format!("operand {}", operand),
        ));
    }

    let exact_operand = float_to_integer(operand);
    let mut values = Vec::with_capacity(dataset.row_count());
    let mut errors = Vec::new();

    for (row, cells) in dataset.rows().iter().enumerate() {
        let cell = &cells[column];
        let computed = match cell {
            CellValue::Integer(x) => match exact_operand.and_then(|o| exact_integer(operation, *x, o)) {
                Some(result) => result.map(CellValue::Integer),
                None => compute(operation, *x as f64, operand).and_then(|f| {
                    float_to_integer(f.round())
                        .map(CellValue::Integer)
                        .ok_or(OUT_OF_RANGE)
                }),
            },
            CellValue::Float(x) => compute(operation, *x, operand).map(CellValue::Float),
            CellValue::Text(_) => Err("not a numeric value"),
        };

        match computed {
            Ok(value) => values.push(value),
            Err(reason) => {
                errors.push(CellError {
                    row,
                    value: cell.to_string(),
                    reason: reason.to_string(),
                });
                values.push(cell.clone());
            }
        }
    }

    let name = dataset.columns()[column].clone();
    let message = if errors.is_empty() {
        format!(
            "{} {} on '{}': {} value(s) ready to commit",
            operation,
            operand,
            name,
            values.len()
        )
    } else {
        format!(
            "{} {} on '{}': {} of {} value(s) could not be computed",
            operation,
            operand,
            name,
            errors.len(),
            values.len()
        )
    };
    debug!(column, errors = errors.len(), "{}", message);

    Ok(NumericPreview {
        kind,
        column_index: column,
        column_name: name,
        data_type,
        parameters: json!({ "operation": operation, "operand": operand }),
        values,
        errors,
        message,
        log_position: dataset.log().len(),
    })
}

/// Clip every cell of a numeric column into `[low, high]`.
///
/// Integer columns clip to the integers inside the range, so the bounds are
/// rounded inward.
pub fn clamp(dataset: &Dataset, column: usize, low: f64, high: f64) -> Result<NumericPreview> {
    let kind = OperationKind::Clamp;
    let data_type = dataset.require_type(kind.label(), column, NUMERIC_TYPES)?;
    let bad_range = || GuapoError::invalid_option(kind.label(), format!("range [{}, {}]", low, high));

    if low.is_nan() || high.is_nan() || low > high {
        return Err(bad_range());
    }

    let values: Vec<CellValue> = match data_type {
        DataType::Integer => {
            let (lo, hi) = (low.ceil(), high.floor());
            if lo > hi {
                return Err(bad_range());
            }
            // `as` saturates, which is what infinite bounds need.
            let (lo, hi) = (lo as i64, hi as i64);
            dataset
                .rows()
                .iter()
                .map(|row| match row[column] {
                    CellValue::Integer(x) => CellValue::Integer(x.clamp(lo, hi)),
                    ref other => other.clone(),
                })
                .collect()
        }
        _ => dataset
            .rows()
            .iter()
            .map(|row| match row[column] {
                CellValue::Float(x) => CellValue::Float(x.clamp(low, high)),
                ref other => other.clone(),
            })
            .collect(),
    };

    let name = dataset.columns()[column].clone();
    let message = format!(
        "clamp '{}' to [{}, {}]: {} value(s) ready to commit",
        name,
        low,
        high,
        values.len()
    );

    Ok(NumericPreview {
        kind,
        column_index: column,
        column_name: name,
        data_type,
        parameters: json!({ "low": low, "high": high }),
        values,
        errors: Vec::new(),
        message,
        log_position: dataset.log().len(),
    })
}

/// Write a preview's series into the dataset and log the operation.
///
/// Refuses previews that carry cell errors, previews computed against a
/// different state of the dataset and pending values whose type differs
/// from the column's declared type.
pub fn commit(dataset: &mut Dataset, preview: NumericPreview) -> Result<TransformChange> {
    if preview.has_errors() {
        return Err(GuapoError::Computation {
            operation: preview.kind.label().to_string(),
            column: preview.column_name,
            failures: preview.errors,
        });
    }

    let declared = dataset.column_type(preview.column_index)?;
    let stale = dataset.log().len() != preview.log_position
        || declared != preview.data_type
        || dataset.row_count() != preview.values.len()
        || dataset.columns()[preview.column_index] != preview.column_name;
    if stale {
        return Err(GuapoError::invalid_option(
            "commit",
            format!(
                "preview of {} on '{}' no longer matches the dataset",
                preview.kind, preview.column_name
            ),
        ));
    }

    if let Some(value) = preview.values.iter().find(|v| v.data_type() != declared) {
        return Err(GuapoError::invalid_option(
            "commit",
            format!(
                "pending value '{}' is {}, column '{}' is {}",
                value,
                value.data_type(),
                preview.column_name,
                declared
            ),
        ));
    }

    let NumericPreview {
        kind,
        column_index,
        column_name,
        parameters,
        values,
        ..
    } = preview;

    let values_changed = dataset.replace_column(column_index, values);
    let description = format!("{} {} on '{}'", kind, parameters, column_name);
    dataset.record(OperationLogEntry::new(
        kind,
        column_name.clone(),
        column_index,
        parameters,
    ));
    info!(
        dataset = %dataset.name(),
        column = column_index,
        values_changed,
        "{}",
        description
    );

    Ok(TransformChange {
        kind,
        description,
        column: column_name,
        column_index,
        values_changed,
    })
}

/// Exact evaluation for an integer cell and a whole operand, or `None` when
/// the operation has no exact form.
fn exact_integer(
    operation: ArithmeticOp,
    x: i64,
    o: i64,
) -> Option<std::result::Result<i64, &'static str>> {
    let result = match operation {
        ArithmeticOp::Add => x.checked_add(o).ok_or(OUT_OF_RANGE),
        ArithmeticOp::Subtract => x.checked_sub(o).ok_or(OUT_OF_RANGE),
        ArithmeticOp::Multiply => x.checked_mul(o).ok_or(OUT_OF_RANGE),
        ArithmeticOp::Divide => rounded_division(x, o),
        ArithmeticOp::Power => {
            let exponent = u32::try_from(o).ok()?;
            x.checked_pow(exponent).ok_or(OUT_OF_RANGE)
        }
        _ => return None,
    };
    Some(result)
}

/// `x / o` rounded half away from zero.
fn rounded_division(x: i64, o: i64) -> std::result::Result<i64, &'static str> {
    if o == 0 {
        return Err("division by zero");
    }
    let (x, o) = (i128::from(x), i128::from(o));
    let mut quotient = x / o;
    let remainder = x % o;
    if 2 * remainder.abs() >= o.abs() {
        quotient += if (x < 0) == (o < 0) { 1 } else { -1 };
    }
    i64::try_from(quotient).map_err(|_| OUT_OF_RANGE)
}

/// Floating-point evaluation of one cell. Errors are per-cell reasons.
fn compute(operation: ArithmeticOp, x: f64, operand: f64) -> std::result::Result<f64, &'static str> {
    let result = match operation {
        ArithmeticOp::Add => x + operand,
        ArithmeticOp::Subtract => x - operand,
        ArithmeticOp::Multiply => x * operand,
        ArithmeticOp::Divide => {
            if operand == 0.0 {
                return Err("division by zero");
            }
            x / operand
        }
        ArithmeticOp::Log => {
            if x <= 0.0 {
                return Err("log of a non-positive value");
            }
            if operand == 0.0 { x.ln() } else { x.log10() }
        }
        ArithmeticOp::Exp => {
            if operand == 0.0 {
                x.exp()
            } else {
                operand.powf(x)
            }
        }
        ArithmeticOp::Power => x.powf(operand),
        ArithmeticOp::Root => {
            if operand == 0.0 {
                return Err("zeroth root");
            }
            let odd_integer = operand.fract() == 0.0 && operand % 2.0 != 0.0;
            if x < 0.0 && odd_integer {
                -(-x).powf(1.0 / operand)
            } else {
                x.powf(1.0 / operand)
            }
        }
    };

    if result.is_finite() {
        Ok(result)
    } else {
        Err("result is not a finite number")
    }
}
