//! Configuration and default constants.
//!
//! [`GuapoConfig`] is the constants provider consumed by the ingestion and
//! cleaning code: candidate delimiters, sampling limits, default blocked words
//! and default dictionary replacements. It can be loaded from a JSON file;
//! any field left out falls back to its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GuapoError, Result};

/// Delimiters tried during inference, in priority order.
pub const COMMON_DELIMITERS: &[&str] = &[",", ";", ":", " ", "\t", "-", "|"];

/// Maximum number of values sampled per column during type inference.
pub const DATA_TYPE_SAMPLE_SIZE: usize = 10;

/// Number of leading raw lines used to infer the delimiter.
pub const DELIMITER_SAMPLE_LINES: usize = 4;

/// Fraction of sampled values that must parse for a numeric promotion.
pub const TYPE_THRESHOLD: f64 = 0.5;

const DEFAULT_BLOCKED_WORDS: &[&str] = &["damn", "crap", "hell"];

const DEFAULT_DICTIONARY: &[(&str, &str)] = &[
    ("&", "and"),
    ("St.", "Street"),
    ("Ave.", "Avenue"),
    ("Rd.", "Road"),
    ("Blvd.", "Boulevard"),
];

/// What to do with data lines whose field count differs from the table's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowPolicy {
    /// Pad short rows with empty cells, truncate long rows.
    #[default]
    Pad,
    /// Fail the build on the first mismatching line.
    Reject,
}

/// Settings for delimiter and type inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Candidate delimiters, highest priority first.
    pub candidate_delimiters: Vec<String>,
    /// How many leading raw lines feed delimiter inference.
    pub inference_lines: usize,
    /// Ceiling on values sampled per column.
    pub sample_size: usize,
    /// Hit ratio a numeric type must exceed.
    pub threshold: f64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            candidate_delimiters: COMMON_DELIMITERS.iter().map(|d| d.to_string()).collect(),
            inference_lines: DELIMITER_SAMPLE_LINES,
            sample_size: DATA_TYPE_SAMPLE_SIZE,
            threshold: TYPE_THRESHOLD,
        }
    }
}

/// Per-build options supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Delimiter to use (None = infer).
    pub delimiter: Option<String>,
    /// Whether the first line is a header.
    pub has_header: bool,
    /// Handling of lines with the wrong field count.
    pub row_policy: RowPolicy,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            row_policy: RowPolicy::Pad,
        }
    }
}

impl BuildOptions {
    /// Create default build options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit delimiter instead of inferring one.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Set whether the first line is a header.
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Set the row-length policy.
    pub fn with_row_policy(mut self, policy: RowPolicy) -> Self {
        self.row_policy = policy;
        self
    }
}

/// Default word lists for the text-cleaning operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningDefaults {
    /// Words redacted by the blocked-words operator.
    pub blocked_words: Vec<String>,
    /// Ordered `(old, new)` replacement pairs.
    pub dictionary: Vec<(String, String)>,
}

impl Default for CleaningDefaults {
    fn default() -> Self {
        Self {
            blocked_words: DEFAULT_BLOCKED_WORDS.iter().map(|w| w.to_string()).collect(),
            dictionary: DEFAULT_DICTIONARY
                .iter()
                .map(|(old, new)| (old.to_string(), new.to_string()))
                .collect(),
        }
    }
}

impl CleaningDefaults {
    /// Split the dictionary into index-aligned old/new lists.
    pub fn dictionary_lists(&self) -> (Vec<String>, Vec<String>) {
        self.dictionary.iter().cloned().unzip()
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuapoConfig {
    pub inference: InferenceConfig,
    pub build: BuildOptions,
    pub cleaning: CleaningDefaults,
}

impl GuapoConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| GuapoError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: GuapoConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the inference code cannot work with.
    pub fn validate(&self) -> Result<()> {
        let inference = &self.inference;
        if inference.candidate_delimiters.is_empty() {
            return Err(GuapoError::Config(
                "candidate_delimiters must not be empty".to_string(),
            ));
        }
        if inference.candidate_delimiters.iter().any(|d| d.is_empty()) {
            return Err(GuapoError::Config(
                "candidate_delimiters must not contain an empty delimiter".to_string(),
            ));
        }
        if inference.sample_size == 0 {
            return Err(GuapoError::Config("sample_size must be at least 1".to_string()));
        }
        if inference.inference_lines == 0 {
            return Err(GuapoError::Config(
                "inference_lines must be at least 1".to_string(),
            ));
        }
        if !(inference.threshold > 0.0 && inference.threshold < 1.0) {
            return Err(GuapoError::Config(format!(
                "threshold must be between 0 and 1, got {}",
                inference.threshold
            )));
        }
        Ok(())
    }
}
