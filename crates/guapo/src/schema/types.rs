//! Core type definitions for column classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GuapoError;

/// Declared data type of a column.
///
/// Only `Text`, `Integer` and `Float` are produced by inference and accepted
/// by the transformation operators. The remaining variants are reserved for
/// future classifiers and formatters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum DataType {
    /// Plain text.
    #[default]
    Text,
    /// Whole numbers.
    Integer,
    /// Floating-point numbers.
    Float,
    /// Calendar dates (needs a format such as `dd/mm/yyyy`).
    Date,
    /// Time of day, not tied to a date.
    Time,
    /// Coordinates (lat/long, UTM, ...).
    Geospatial,
    /// Vectors such as position/velocity.
    Vector,
    /// Nested key/value documents (JSON, XML).
    Dictionary,
    /// True/false values.
    Boolean,
}

impl DataType {
    /// All variants, in declaration order.
    pub const ALL: [DataType; 9] = [
        DataType::Text,
        DataType::Integer,
        DataType::Float,
        DataType::Date,
        DataType::Time,
        DataType::Geospatial,
        DataType::Vector,
        DataType::Dictionary,
        DataType::Boolean,
    ];

    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }

    /// Returns true if the operators can act on this type.
    pub fn is_supported(&self) -> bool {
        matches!(self, DataType::Text | DataType::Integer | DataType::Float)
    }

    /// Lowercase name used in messages and serialized forms.
    pub fn label(&self) -> &'static str {
        match self {
            DataType::Text => "text",
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::Date => "date",
            DataType::Time => "time",
            DataType::Geospatial => "geospatial",
            DataType::Vector => "vector",
            DataType::Dictionary => "dictionary",
            DataType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DataType {
    type Err = GuapoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::ALL
            .iter()
            .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| GuapoError::invalid_option("data_type", s))
    }
}

impl TryFrom<String> for DataType {
    type Error = GuapoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

const FLOAT_FORMATS: &[&str] = &[
    "0.0", "1eN", "1/1", "%", "Binary", "Hex", "Octal", "Currency",
];

const DATE_FORMATS: &[&str] = &[
    "dd/mm/yyyy",
    "dd/mm/yy",
    "dd/MM/yyyy",
    "mm/dd/yyyy",
    "MM/dd/yyyy",
    "mm/yyyy",
    "MM/yyyy",
];

const GEOSPATIAL_FORMATS: &[&str] = &[
    "UTM:Zone,Lat,Long",
    "UTM:Lat,Long",
    "UTM:Lat",
    "UTM:Long",
    "UTM:Zone",
    "DD:Lat,Long",
    "DD:Lat",
    "DD:Long",
    "DMS:Lat",
    "DMS:Long",
    "DMS:Lat,Long",
    "DDM:Lat",
    "DDM:Long",
    "DDM:Lat,Long",
    "OpenLocationCode",
];

/// Auxiliary format refining how a column of some [`DataType`] is displayed
/// or parsed, e.g. a date pattern or a float display style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataFormat(String);

impl DataFormat {
    /// Create a format from any string.
    pub fn new(format: impl Into<String>) -> Self {
        Self(format.into())
    }

    /// The raw format string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Formats recognised for a data type. Empty for types without a catalogue.
    pub fn known(data_type: DataType) -> &'static [&'static str] {
        match data_type {
            DataType::Float => FLOAT_FORMATS,
            DataType::Date => DATE_FORMATS,
            DataType::Geospatial => GEOSPATIAL_FORMATS,
            _ => &[],
        }
    }

    /// Check whether this format is in the catalogue for `data_type`.
    pub fn is_known_for(&self, data_type: DataType) -> bool {
        Self::known(data_type).contains(&self.0.as_str())
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
