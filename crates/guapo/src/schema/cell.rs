//! Typed cell values.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::DataType;

/// A single typed cell of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl CellValue {
    /// Parse a raw field as an integer literal (optional sign, digits only).
    pub fn parse_integer(raw: &str) -> Option<i64> {
        raw.parse::<i64>().ok()
    }

    /// Parse a raw field as a float literal (sign, decimal point, exponent).
    pub fn parse_float(raw: &str) -> Option<f64> {
        raw.parse::<f64>().ok()
    }

    /// The data type this value currently holds.
    pub fn data_type(&self) -> DataType {
        match self {
            CellValue::Text(_) => DataType::Text,
            CellValue::Integer(_) => DataType::Integer,
            CellValue::Float(_) => DataType::Float,
        }
    }

    /// Borrow the text if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the cell, if numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            CellValue::Text(_) => None,
        }
    }

    /// Convert the cell to `target`, or `None` if it cannot be represented.
    ///
    /// Text always succeeds. Floats convert to integers only when they are
    /// whole and in range. Types without an implementation never convert.
    pub fn cast(&self, target: DataType) -> Option<CellValue> {
        match target {
            DataType::Text => Some(CellValue::Text(self.to_string())),
            DataType::Integer => match self {
                CellValue::Integer(i) => Some(CellValue::Integer(*i)),
                CellValue::Text(s) => Self::parse_integer(s).map(CellValue::Integer),
                CellValue::Float(f) => float_to_integer(*f).map(CellValue::Integer),
            },
            DataType::Float => match self {
                CellValue::Float(f) => Some(CellValue::Float(*f)),
                CellValue::Integer(i) => Some(CellValue::Float(*i as f64)),
                CellValue::Text(s) => Self::parse_float(s).map(CellValue::Float),
            },
            _ => None,
        }
    }
}

/// Whole, in-range floats as `i64`.
pub(crate) fn float_to_integer(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Integer(i) => write!(f, "{}", i),
            // Debug keeps the trailing ".0" so floats stay visibly floats.
            CellValue::Float(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}
