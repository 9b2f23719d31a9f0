//! Append-only audit log of applied operations.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of operation recorded in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    RemoveWhitespace,
    Capitalization,
    BlockedWords,
    DictionaryReplace,
    Arithmetic,
    Clamp,
    CastColumn,
}

impl OperationKind {
    /// Short name used in log displays and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::RemoveWhitespace => "remove_whitespace",
            OperationKind::Capitalization => "capitalization",
            OperationKind::BlockedWords => "blocked_words",
            OperationKind::DictionaryReplace => "dictionary_replace",
            OperationKind::Arithmetic => "arithmetic",
            OperationKind::Clamp => "clamp",
            OperationKind::CastColumn => "cast_column",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One applied operation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationLogEntry {
    /// What was applied.
    pub kind: OperationKind,
    /// Name of the target column at the time of the operation.
    pub column_name: String,
    /// Zero-based index of the target column.
    pub column_index: usize,
    /// Operator parameters (mode, word lists, operand, ...).
    pub parameters: Value,
    /// When the entry was appended.
    pub applied_at: DateTime<Utc>,
}

impl OperationLogEntry {
    /// Create an entry stamped with the current time.
    pub fn new(
        kind: OperationKind,
        column_name: impl Into<String>,
        column_index: usize,
        parameters: Value,
    ) -> Self {
        Self {
            kind,
            column_name: column_name.into(),
            column_index,
            parameters,
            applied_at: Utc::now(),
        }
    }
}

impl fmt::Display for OperationLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on '{}' [{}] {}",
            self.kind, self.column_name, self.column_index, self.parameters
        )
    }
}

/// Chronological record of applied operations. There is no removal API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationLog {
    entries: Vec<OperationLogEntry>,
}

impl OperationLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn append(&mut self, entry: OperationLogEntry) {
        self.entries.push(entry);
    }

    /// All entries in append order.
    pub fn entries(&self) -> &[OperationLogEntry] {
        &self.entries
    }

    /// Most recently appended entry.
    pub fn last(&self) -> Option<&OperationLogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that targeted a given column.
    pub fn for_column(&self, column_index: usize) -> impl Iterator<Item = &OperationLogEntry> {
        self.entries
            .iter()
            .filter(move |e| e.column_index == column_index)
    }
}
