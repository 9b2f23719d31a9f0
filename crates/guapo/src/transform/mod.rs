//! Column operators, their script form and the operation log.
//!
//! Text operators ([`remove_whitespace`], [`capitalization`], [`blocked_words`],
//! [`dictionary_replace`]) rewrite a column immediately. Numeric operators
//! ([`arithmetic`], [`clamp`]) return a [`NumericPreview`] that is applied
//! with [`commit`]. [`word_statistics`] and [`search`] only read.

mod engine;
mod log;
mod numeric;
mod operations;
mod query;
mod text;

pub use engine::TransformEngine;
pub use log::{OperationKind, OperationLog, OperationLogEntry};
pub use numeric::{arithmetic, clamp, commit, NumericPreview};
pub use operations::{
    ArithmeticOp, CapitalizationMode, TransformChange, TransformOperation, TransformResult,
    WhitespaceMode,
};
pub use query::{search, word_statistics, WordStatistics};
pub use text::{blocked_words, capitalization, dictionary_replace, remove_whitespace};
