//! String-cleaning operators for text columns.
//!
//! Every operator checks that the target column is declared as text and that
//! all of its cells hold text, computes the whole new column, and only then
//! writes it back and appends a log entry. A rejected call leaves the dataset
//! untouched.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use tracing::info;

use crate::dataset::Dataset;
use crate::error::{GuapoError, Result};
use crate::schema::{CellValue, DataType};

use super::log::{OperationKind, OperationLogEntry};
use super::operations::{CapitalizationMode, TransformChange, WhitespaceMode};

/// Runs of two or more whitespace characters.
static DOUBLE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Remove whitespace from every cell of a text column.
///
/// `Doubles` deletes each run of two or more whitespace characters outright,
/// so `"Rio   de Janeiro"` becomes `"Riode Janeiro"`.
pub fn remove_whitespace(
    dataset: &mut Dataset,
    column: usize,
    mode: WhitespaceMode,
) -> Result<TransformChange> {
    rewrite_text(
        dataset,
        column,
        OperationKind::RemoveWhitespace,
        json!({ "mode": mode }),
        |value| strip_whitespace(value, mode),
    )
}

/// Re-case every cell of a text column.
pub fn capitalization(
    dataset: &mut Dataset,
    column: usize,
    mode: CapitalizationMode,
) -> Result<TransformChange> {
    rewrite_text(
        dataset,
        column,
        OperationKind::Capitalization,
        json!({ "mode": mode }),
        |value| recase(value, mode),
    )
}

/// Replace each case-sensitive occurrence of every word with as many `*` as
/// the word has characters. Words are matched literally.
pub fn blocked_words<S: AsRef<str>>(
    dataset: &mut Dataset,
    column: usize,
    words: &[S],
) -> Result<TransformChange> {
    let operation = OperationKind::BlockedWords;
    let words: Vec<&str> = words.iter().map(AsRef::as_ref).collect();
    if words.iter().any(|w| w.is_empty()) {
        return Err(GuapoError::invalid_option(operation.label(), "empty blocked word"));
    }

    rewrite_text(
        dataset,
        column,
        operation,
        json!({ "words": words }),
        |value| redact(value, &words),
    )
}

/// Replace `old[i]` with `new[i]` in list order. Later replacements see the
/// output of earlier ones.
pub fn dictionary_replace<S: AsRef<str>, T: AsRef<str>>(
    dataset: &mut Dataset,
    column: usize,
    old: &[S],
    new: &[T],
) -> Result<TransformChange> {
    let operation = OperationKind::DictionaryReplace;
    if old.len() != new.len() {
        return Err(GuapoError::invalid_option(
            operation.label(),
            format!("{} old word(s) but {} replacement(s)", old.len(), new.len()),
        ));
    }

    let pairs: Vec<(&str, &str)> = old
        .iter()
        .map(AsRef::as_ref)
        .zip(new.iter().map(AsRef::as_ref))
        .collect();
    if pairs.iter().any(|(from, _)| from.is_empty()) {
        return Err(GuapoError::invalid_option(operation.label(), "empty dictionary word"));
    }

    rewrite_text(
        dataset,
        column,
        operation,
        json!({
            "old": pairs.iter().map(|(from, _)| *from).collect::<Vec<_>>(),
            "new": pairs.iter().map(|(_, to)| *to).collect::<Vec<_>>(),
        }),
        |value| {
            pairs
                .iter()
                .fold(value.to_string(), |acc, (from, to)| acc.replace(from, to))
        },
    )
}

/// Shared body of the text operators: type check, compute, replace, log.
fn rewrite_text<F>(
    dataset: &mut Dataset,
    column: usize,
    operation: OperationKind,
    parameters: Value,
    rewrite: F,
) -> Result<TransformChange>
where
    F: Fn(&str) -> String,
{
    dataset.require_type(operation.label(), column, &[DataType::Text])?;

    let values: Vec<CellValue> = dataset
        .rows()
        .iter()
        .map(|row| CellValue::Text(rewrite(row[column].as_text().unwrap_or_default())))
        .collect();

    let values_changed = dataset.replace_column(column, values);
    let name = dataset.columns()[column].clone();
    let description = format!("{} {} on '{}'", operation, parameters, name);

    dataset.record(OperationLogEntry::new(operation, name.clone(), column, parameters));
    info!(
        dataset = %dataset.name(),
        column,
        values_changed,
        "{}",
        description
    );

    Ok(TransformChange {
        kind: operation,
        description,
        column: name,
        column_index: column,
        values_changed,
    })
}

pub(crate) fn strip_whitespace(value: &str, mode: WhitespaceMode) -> String {
    match mode {
        WhitespaceMode::Trailing => value.trim_end().to_string(),
        WhitespaceMode::Leading => value.trim_start().to_string(),
        WhitespaceMode::Both => value.trim().to_string(),
        WhitespaceMode::Doubles => DOUBLE_WHITESPACE.replace_all(value, "").into_owned(),
        WhitespaceMode::All => DOUBLE_WHITESPACE.replace_all(value.trim(), "").into_owned(),
    }
}

pub(crate) fn recase(value: &str, mode: CapitalizationMode) -> String {
    match mode {
        CapitalizationMode::All => value.to_uppercase(),
        CapitalizationMode::Lowercase => value.to_lowercase(),
        CapitalizationMode::Each => title_case(value),
        CapitalizationMode::First => capitalize_first(value),
        CapitalizationMode::Invert => swap_case(value),
    }
}

pub(crate) fn redact(value: &str, words: &[&str]) -> String {
    words.iter().fold(value.to_string(), |acc, word| {
        acc.replace(word, &"*".repeat(word.chars().count()))
    })
}

/// Uppercase the first letter of every run of letters, lowercase the rest.
fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

fn swap_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_uppercase() {
            out.extend(c.to_lowercase());
        } else if c.is_lowercase() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cities() -> Dataset {
        Dataset::new(
            "cities",
            vec!["City".to_string(), "Pop".to_string()],
            vec![DataType::Text, DataType::Integer],
            vec![
                vec![CellValue::from("  Rio   de   Janeiro "), CellValue::Integer(6)],
                vec![CellValue::from("são paulo"), CellValue::Integer(12)],
            ],
        )
        .unwrap()
    }

    fn texts(ds: &Dataset, column: usize) -> Vec<String> {
        ds.rows().iter().map(|row| row[column].to_string()).collect()
    }

    #[test]
    fn test_whitespace_modes() {
        assert_eq!(strip_whitespace("  a b  ", WhitespaceMode::Trailing), "  a b");
        assert_eq!(strip_whitespace("  a b  ", WhitespaceMode::Leading), "a b  ");
        assert_eq!(strip_whitespace("  a b  ", WhitespaceMode::Both), "a b");
        assert_eq!(
            strip_whitespace("Rio   de   Janeiro", WhitespaceMode::Doubles),
            "RiodeJaneiro"
        );
        assert_eq!(
            strip_whitespace("Rio   de Janeiro", WhitespaceMode::Doubles),
            "Riode Janeiro"
        );
        assert_eq!(strip_whitespace(" a\t\tb ", WhitespaceMode::All), "ab");
    }

    #[test]
    fn test_capitalization_modes() {
        assert_eq!(recase("rio de JANEIRO", CapitalizationMode::All), "RIO DE JANEIRO");
        assert_eq!(recase("rio de JANEIRO", CapitalizationMode::Each), "Rio De Janeiro");
        assert_eq!(recase("rio de JANEIRO", CapitalizationMode::First), "Rio de janeiro");
        assert_eq!(recase("Rio De", CapitalizationMode::Lowercase), "rio de");
        assert_eq!(recase("Rio de", CapitalizationMode::Invert), "rIO DE");
        assert_eq!(recase("o'neil-smith", CapitalizationMode::Each), "O'Neil-Smith");
        assert_eq!(recase("", CapitalizationMode::First), "");
    }

    #[test]
    fn test_redact_is_literal_and_length_preserving() {
        assert_eq!(redact("a.b a+b", &["a.b"]), "*** a+b");
        assert_eq!(redact("Hell hello hell", &["hell"]), "Hell ****o ****");
        assert_eq!(redact("café", &["é"]), "caf*");
    }

    #[test]
    fn test_remove_whitespace_logs_entry() {
        let mut ds = cities();
        let change = remove_whitespace(&mut ds, 0, WhitespaceMode::All).unwrap();
        assert_eq!(change.values_changed, 1);
        assert_eq!(texts(&ds, 0), vec!["RiodeJaneiro", "são paulo"]);

        let entry = ds.log().last().unwrap();
        assert_eq!(entry.kind, OperationKind::RemoveWhitespace);
        assert_eq!(entry.column_name, "City");
        assert_eq!(entry.parameters["mode"], "all");
    }

    #[test]
    fn test_text_operator_rejects_numeric_column() {
        let mut ds = cities();
        let before = ds.clone();
        let err = capitalization(&mut ds, 1, CapitalizationMode::All).unwrap_err();
        assert!(matches!(
            err,
            GuapoError::WrongColumnType {
                index: 1,
                actual: DataType::Integer,
                ..
            }
        ));
        assert_eq!(ds, before);

        let err = capitalization(&mut ds, 4, CapitalizationMode::All).unwrap_err();
        assert!(matches!(err, GuapoError::IndexOutOfRange { .. }));
    }

    #[test]
    fn test_blocked_words_operator() {
        let mut ds = cities();
        blocked_words(&mut ds, 0, &["paulo", "de"]).unwrap();
        assert_eq!(texts(&ds, 0), vec!["  Rio   **   Janeiro ", "são *****"]);

        let err = blocked_words(&mut ds, 0, &[""]).unwrap_err();
        assert!(matches!(err, GuapoError::InvalidOption { .. }));
        assert_eq!(ds.log().len(), 1);
    }

    #[test]
    fn test_dictionary_replace_is_sequential() {
        let mut ds = cities();
        dictionary_replace(&mut ds, 0, &["são", "SÃO"], &["SÃO", "Sao"]).unwrap();
        assert_eq!(texts(&ds, 0)[1], "Sao paulo");

        let err = dictionary_replace(&mut ds, 0, &["a", "b"], &["c"]).unwrap_err();
        assert!(matches!(err, GuapoError::InvalidOption { .. }));
        let err = dictionary_replace(&mut ds, 0, &[""], &["x"]).unwrap_err();
        assert!(matches!(err, GuapoError::InvalidOption { .. }));
    }
}
