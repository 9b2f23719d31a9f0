//! Dispatcher that applies scripted operations to a dataset.

use tracing::debug;

use crate::config::CleaningDefaults;
use crate::dataset::Dataset;
use crate::error::{GuapoError, Result};

use super::numeric::{self, NumericPreview};
use super::operations::{TransformChange, TransformOperation, TransformResult};
use super::text;

/// Applies [`TransformOperation`]s, filling omitted word lists from the
/// configured cleaning defaults.
#[derive(Debug, Clone, Default)]
pub struct TransformEngine {
    cleaning: CleaningDefaults,
}

impl TransformEngine {
    /// Create an engine with the built-in cleaning defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom cleaning defaults.
    pub fn with_defaults(cleaning: CleaningDefaults) -> Self {
        Self { cleaning }
    }

    pub fn cleaning(&self) -> &CleaningDefaults {
        &self.cleaning
    }

    /// Apply one operation. Numeric operations are previewed and committed in
    /// one step.
    pub fn apply(&self, dataset: &mut Dataset, operation: &TransformOperation) -> Result<TransformChange> {
        debug!(operation = %operation.description(), "applying operation");

        match operation {
            TransformOperation::RemoveWhitespace { column, mode } => {
                text::remove_whitespace(dataset, *column, *mode)
            }
            TransformOperation::Capitalization { column, mode } => {
                text::capitalization(dataset, *column, *mode)
            }
            TransformOperation::BlockedWords { column, words } => {
                let words = words.as_ref().unwrap_or(&self.cleaning.blocked_words);
                text::blocked_words(dataset, *column, words)
            }
            TransformOperation::DictionaryReplace { column, old, new } => match (old, new) {
                (Some(old), Some(new)) => text::dictionary_replace(dataset, *column, old, new),
                (None, None) => {
                    let (old, new) = self.cleaning.dictionary_lists();
                    text::dictionary_replace(dataset, *column, &old, &new)
                }
                // One list without the other is a length mismatch.
                (Some(old), None) => {
                    text::dictionary_replace(dataset, *column, old, &[] as &[String])
                }
                (None, Some(new)) => {
                    text::dictionary_replace(dataset, *column, &[] as &[String], new)
                }
            },
            TransformOperation::CastColumn {
                column,
                data_type,
                format,
            } => dataset.cast_column(*column, *data_type, format.clone()),
            TransformOperation::Arithmetic { .. } | TransformOperation::Clamp { .. } => {
                let preview = self.numeric_preview(dataset, operation)?;
                numeric::commit(dataset, preview)
            }
        }
    }

    /// Compute the pending series of a numeric operation without applying it.
    /// Returns `None` for operations that have no preview step.
    pub fn preview(&self, dataset: &Dataset, operation: &TransformOperation) -> Result<Option<NumericPreview>> {
        if operation.is_numeric() {
            self.numeric_preview(dataset, operation).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Apply operations in order, stopping at the first failure. Operations
    /// applied before the failure stay applied.
    pub fn apply_all(
        &self,
        dataset: &mut Dataset,
        operations: &[TransformOperation],
    ) -> Result<TransformResult> {
        let mut result = TransformResult::new();
        for operation in operations {
            let change = self.apply(dataset, operation)?;
            result.add_change(change);
        }
        Ok(result)
    }

    fn numeric_preview(&self, dataset: &Dataset, operation: &TransformOperation) -> Result<NumericPreview> {
        match operation {
            TransformOperation::Arithmetic {
                column,
                operation,
                operand,
            } => numeric::arithmetic(dataset, *column, *operation, *operand),
            TransformOperation::Clamp { column, low, high } => {
                numeric::clamp(dataset, *column, *low, *high)
            }
            other => Err(GuapoError::invalid_option(
                "preview",
                other.kind().label(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::build;
    use crate::schema::{CellValue, DataType};
    use crate::transform::{ArithmeticOp, CapitalizationMode, OperationKind, WhitespaceMode};

    fn streets() -> Dataset {
        build(
            &[
                "Address;Number;Note",
                "Main St. & 2nd;12;oh hell",
                "Elm Ave.;7;fine",
            ],
            None,
            true,
        )
        .unwrap()
    }

    #[test]
    fn test_apply_uses_default_word_lists() {
        let mut ds = streets();
        let engine = TransformEngine::new();

        engine
            .apply(
                &mut ds,
                &TransformOperation::DictionaryReplace {
                    column: 0,
                    old: None,
                    new: None,
                },
            )
            .unwrap();
        assert_eq!(ds.get(0, 0), Some(&CellValue::from("Main Street and 2nd")));
        assert_eq!(ds.get(1, 0), Some(&CellValue::from("Elm Avenue")));

        engine
            .apply(
                &mut ds,
                &TransformOperation::BlockedWords {
                    column: 2,
                    words: None,
                },
            )
            .unwrap();
        assert_eq!(ds.get(0, 2), Some(&CellValue::from("oh ****")));
    }

    #[test]
    fn test_apply_all_records_changes_in_order() {
        let mut ds = streets();
        let ops = vec![
            TransformOperation::Capitalization {
                column: 0,
                mode: CapitalizationMode::All,
            },
            TransformOperation::Arithmetic {
                column: 1,
                operation: ArithmeticOp::Add,
                operand: 5.0,
            },
            TransformOperation::CastColumn {
                column: 1,
                data_type: DataType::Float,
                format: None,
            },
        ];

        let result = TransformEngine::new().apply_all(&mut ds, &ops).unwrap();
        assert_eq!(result.operations_applied, 3);
        assert_eq!(ds.get(1, 1), Some(&CellValue::Float(12.0)));

        let kinds: Vec<_> = ds.log().entries().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                OperationKind::Capitalization,
                OperationKind::Arithmetic,
                OperationKind::CastColumn
            ]
        );
    }

    #[test]
    fn test_apply_all_stops_at_first_error() {
        let mut ds = streets();
        let ops = vec![
            TransformOperation::RemoveWhitespace {
                column: 2,
                mode: WhitespaceMode::Both,
            },
            TransformOperation::RemoveWhitespace {
                column: 1,
                mode: WhitespaceMode::Both,
            },
            TransformOperation::Capitalization {
                column: 0,
                mode: CapitalizationMode::All,
            },
        ];

        let err = TransformEngine::new().apply_all(&mut ds, &ops).unwrap_err();
        assert!(matches!(err, GuapoError::WrongColumnType { index: 1, .. }));
        assert_eq!(ds.log().len(), 1);
        assert_eq!(ds.get(0, 0), Some(&CellValue::from("Main St. & 2nd")));
    }

    #[test]
    fn test_preview_only_for_numeric() {
        let ds = streets();
        let engine = TransformEngine::new();
        let preview = engine
            .preview(
                &ds,
                &TransformOperation::Clamp {
                    column: 1,
                    low: 0.0,
                    high: 10.0,
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(preview.values[0], CellValue::Integer(10));
        assert!(ds.log().is_empty());

        let none = engine
            .preview(
                &ds,
                &TransformOperation::Capitalization {
                    column: 0,
                    mode: CapitalizationMode::First,
                },
            )
            .unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_half_dictionary_is_invalid() {
        let mut ds = streets();
        let err = TransformEngine::new()
            .apply(
                &mut ds,
                &TransformOperation::DictionaryReplace {
                    column: 0,
                    old: Some(vec!["St.".to_string()]),
                    new: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, GuapoError::InvalidOption { .. }));
    }
}
