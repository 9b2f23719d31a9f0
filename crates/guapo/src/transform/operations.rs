//! Operator modes and the serializable operation script.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GuapoError;
use crate::schema::{DataFormat, DataType};

use super::log::OperationKind;

/// Declares a closed set of modes with a label per variant and a `FromStr`
/// that rejects unknown labels with `InvalidOption`. Deserialisation goes
/// through the same `FromStr`.
macro_rules! mode_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $operation:literal {
            $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case", try_from = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every mode, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Label accepted by `FromStr`.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = GuapoError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $name::ALL
                    .iter()
                    .find(|mode| mode.label().eq_ignore_ascii_case(wanted))
                    .copied()
                    .ok_or_else(|| GuapoError::invalid_option($operation, s))
            }
        }

        impl TryFrom<String> for $name {
            type Error = GuapoError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

mode_enum! {
    /// Which whitespace to remove.
    WhitespaceMode, "remove_whitespace" {
        /// Strip trailing whitespace.
        Trailing => "trailing",
        /// Strip leading whitespace.
        Leading => "leading",
        /// Strip both ends.
        Both => "both",
        /// Delete every run of two or more whitespace characters.
        Doubles => "doubles",
        /// `Both`, then `Doubles`.
        All => "all",
    }
}

mode_enum! {
    /// Capitalization rule.
    CapitalizationMode, "capitalization" {
        /// Uppercase everything.
        All => "all",
        /// Title-case each word.
        Each => "each",
        /// Uppercase the first character, lowercase the rest.
        First => "first",
        /// Lowercase everything.
        Lowercase => "lowercase",
        /// Swap the case of every letter.
        Invert => "invert",
    }
}

mode_enum! {
    /// Element-wise arithmetic applied by the numeric operator.
    ArithmeticOp, "arithmetic" {
        Add => "add",
        Subtract => "subtract",
        Multiply => "multiply",
        Divide => "divide",
        /// Natural log when the operand is 0, base-10 log otherwise.
        Log => "log",
        /// `e^x` when the operand is 0, `operand^x` otherwise.
        Exp => "exp",
        /// `x^operand`.
        Power => "power",
        /// `x^(1/operand)`.
        Root => "root",
    }
}

/// A column operation, as read from an operation script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TransformOperation {
    RemoveWhitespace {
        column: usize,
        mode: WhitespaceMode,
    },

    Capitalization {
        column: usize,
        mode: CapitalizationMode,
    },

    /// Redact words. `None` uses the configured default list.
    BlockedWords {
        column: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        words: Option<Vec<String>>,
    },

    /// Replace `old[i]` with `new[i]` in order. `None` uses the configured
    /// default dictionary.
    DictionaryReplace {
        column: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        old: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new: Option<Vec<String>>,
    },

    Arithmetic {
        column: usize,
        operation: ArithmeticOp,
        operand: f64,
    },

    Clamp {
        column: usize,
        low: f64,
        high: f64,
    },

    CastColumn {
        column: usize,
        data_type: DataType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<DataFormat>,
    },
}

/// `op` tags accepted in an operation script.
const OPERATION_TAGS: &[&str] = &[
    "remove_whitespace",
    "capitalization",
    "blocked_words",
    "dictionary_replace",
    "arithmetic",
    "clamp",
    "cast_column",
];

impl TransformOperation {
    /// Parse a JSON operation script (an array of operations).
    ///
    /// Unknown `op` tags and unknown modes are reported as `InvalidOption`
    /// naming the operation and the rejected value. Other malformed input
    /// is a `Json` error.
    pub fn parse_script(text: &str) -> crate::error::Result<Vec<TransformOperation>> {
        let raw: Vec<Value> = serde_json::from_str(text)?;
        raw.into_iter()
            .map(|value| -> crate::error::Result<TransformOperation> {
                check_tags(&value)?;
                Ok(serde_json::from_value::<TransformOperation>(value)?)
            })
            .collect()
    }

    /// Target column index.
    pub fn column(&self) -> usize {
        match self {
            TransformOperation::RemoveWhitespace { column, .. }
            | TransformOperation::Capitalization { column, .. }
            | TransformOperation::BlockedWords { column, .. }
            | TransformOperation::DictionaryReplace { column, .. }
            | TransformOperation::Arithmetic { column, .. }
            | TransformOperation::Clamp { column, .. }
            | TransformOperation::CastColumn { column, .. } => *column,
        }
    }

    /// Kind recorded in the operation log.
    pub fn kind(&self) -> OperationKind {
        match self {
            TransformOperation::RemoveWhitespace { .. } => OperationKind::RemoveWhitespace,
            TransformOperation::Capitalization { .. } => OperationKind::Capitalization,
            TransformOperation::BlockedWords { .. } => OperationKind::BlockedWords,
            TransformOperation::DictionaryReplace { .. } => OperationKind::DictionaryReplace,
            TransformOperation::Arithmetic { .. } => OperationKind::Arithmetic,
            TransformOperation::Clamp { .. } => OperationKind::Clamp,
            TransformOperation::CastColumn { .. } => OperationKind::CastColumn,
        }
    }

    /// Numeric operators go through preview and commit.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TransformOperation::Arithmetic { .. } | TransformOperation::Clamp { .. }
        )
    }

    /// Get a human-readable description of the operation.
    pub fn description(&self) -> String {
        match self {
            TransformOperation::RemoveWhitespace { column, mode } => {
                format!("Remove {} whitespace in column {}", mode, column)
            }
            TransformOperation::Capitalization { column, mode } => {
                format!("Capitalization '{}' in column {}", mode, column)
            }
            TransformOperation::BlockedWords { column, words } => match words {
                Some(words) => format!("Redact {} word(s) in column {}", words.len(), column),
                None => format!("Redact default blocked words in column {}", column),
            },
            TransformOperation::DictionaryReplace { column, old, .. } => match old {
                Some(old) => format!("Replace {} word(s) in column {}", old.len(), column),
                None => format!("Apply default dictionary to column {}", column),
            },
            TransformOperation::Arithmetic {
                column,
                operation,
                operand,
            } => format!("{} {} on column {}", operation, operand, column),
            TransformOperation::Clamp { column, low, high } => {
                format!("Clamp column {} to [{}, {}]", column, low, high)
            }
            TransformOperation::CastColumn {
                column, data_type, ..
            } => format!("Cast column {} to {}", column, data_type),
        }
    }
}

/// Validate the tag and mode strings of one raw operation.
fn check_tags(value: &Value) -> crate::error::Result<()> {
    let field = |key: &str| value.get(key).and_then(Value::as_str);

    let Some(op) = field("op") else {
        return Ok(());
    };
    if !OPERATION_TAGS.contains(&op) {
        return Err(GuapoError::invalid_option("operation script", op));
    }

    match (op, field("mode"), field("operation"), field("data_type")) {
        ("remove_whitespace", Some(mode), _, _) => mode.parse::<WhitespaceMode>().map(drop),
        ("capitalization", Some(mode), _, _) => mode.parse::<CapitalizationMode>().map(drop),
        ("arithmetic", _, Some(operation), _) => operation.parse::<ArithmeticOp>().map(drop),
        ("cast_column", _, _, Some(data_type)) => data_type.parse::<DataType>().map(drop),
        _ => Ok(()),
    }
}

/// Summary of a committed change, returned to the caller for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformChange {
    /// Operation that produced the change.
    pub kind: OperationKind,

    /// Description of the change.
    pub description: String,

    /// Column affected.
    pub column: String,

    /// Index of the column affected.
    pub column_index: usize,

    /// Number of values changed.
    pub values_changed: usize,
}

/// Result of applying a sequence of operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformResult {
    /// Number of operations applied.
    pub operations_applied: usize,

    /// Total values changed across operations.
    pub values_changed: usize,

    /// Detailed changes for each operation.
    pub changes: Vec<TransformChange>,
}

impl TransformResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a change to the result.
    pub fn add_change(&mut self, change: TransformChange) {
        self.operations_applied += 1;
        self.values_changed += change.values_changed;
        self.changes.push(change);
    }
}
