//! Delimiter inference from a header line and a few sample lines.

use tracing::{debug, warn};

use crate::config::COMMON_DELIMITERS;
use crate::error::GuapoError;

/// Outcome of delimiter inference.
#[derive(Debug)]
pub struct DelimiterInference {
    /// Header split into column names.
    pub columns: Vec<String>,
    /// Resolved delimiter; empty when no reliable delimiter was found.
    pub delimiter: String,
    /// Soft failure. Set to [`GuapoError::NoDelimiterFound`] when every
    /// candidate was eliminated and the header was kept as one column.
    pub error: Option<GuapoError>,
}

impl DelimiterInference {
    /// True when inference degraded to a single unsplit column.
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// Picks the field delimiter for a block of delimited text.
#[derive(Debug, Clone)]
pub struct DelimiterInferer {
    candidates: Vec<String>,
}

impl DelimiterInferer {
    /// Create an inferer over the common delimiters.
    pub fn new() -> Self {
        Self {
            candidates: COMMON_DELIMITERS.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// Create an inferer over a custom candidate list (highest priority first).
    pub fn with_candidates(candidates: Vec<String>) -> Self {
        Self { candidates }
    }

    /// Candidate delimiters in priority order.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Split `header` into column names, inferring the delimiter from `sample`
    /// unless `explicit` is given.
    pub fn infer<S: AsRef<str>>(
        &self,
        header: &str,
        sample: &[S],
        explicit: Option<&str>,
    ) -> DelimiterInference {
        if let Some(delimiter) = explicit {
            return DelimiterInference {
                columns: split_owned(header, delimiter),
                delimiter: delimiter.to_string(),
                error: None,
            };
        }

        match self.detect(sample) {
            Some(delimiter) => DelimiterInference {
                columns: split_owned(header, delimiter),
                delimiter: delimiter.to_string(),
                error: None,
            },
            None => {
                warn!("no consistent delimiter found, keeping the header as a single column");
                DelimiterInference {
                    columns: vec![header.to_string()],
                    delimiter: String::new(),
                    error: Some(GuapoError::NoDelimiterFound {
                        candidates: self.candidates.clone(),
                    }),
                }
            }
        }
    }

    /// Choose a delimiter from sample lines, or `None` if no candidate splits
    /// the sample consistently.
    ///
    /// Candidates with the highest total occurrence count lead. A single leader
    /// wins outright; ties are narrowed to candidates that split every sample
    /// line into the same number of fields, then resolved by priority order.
    pub fn detect<S: AsRef<str>>(&self, sample: &[S]) -> Option<&str> {
        let counts: Vec<usize> = self
            .candidates
            .iter()
            .map(|delim| {
                sample
                    .iter()
                    .map(|line| line.as_ref().matches(delim.as_str()).count())
                    .sum()
            })
            .collect();

        let max_count = counts.iter().copied().max()?;
        let leaders: Vec<&str> = self
            .candidates
            .iter()
            .zip(&counts)
            .filter(|(_, count)| **count == max_count)
            .map(|(delim, _)| delim.as_str())
            .collect();

        debug!(?counts, max_count, leaders = leaders.len(), "delimiter candidate counts");

        if let [only] = leaders.as_slice() {
            return Some(*only);
        }

        leaders
            .into_iter()
            .find(|delim| splits_consistently(sample, delim))
    }
}

impl Default for DelimiterInferer {
    fn default() -> Self {
        Self::new()
    }
}

/// True if every sample line has as many fields as the first one.
fn splits_consistently<S: AsRef<str>>(sample: &[S], delimiter: &str) -> bool {
    let mut field_counts = sample
        .iter()
        .map(|line| split_fields(line.as_ref(), delimiter).len());

    match field_counts.next() {
        Some(first) => field_counts.all(|count| count == first),
        None => true,
    }
}

/// Split a line on a literal delimiter. An empty delimiter yields the whole
/// line as one field.
pub fn split_fields<'a>(line: &'a str, delimiter: &str) -> Vec<&'a str> {
    if delimiter.is_empty() {
        vec![line]
    } else {
        line.split(delimiter).collect()
    }
}

fn split_owned(line: &str, delimiter: &str) -> Vec<String> {
    split_fields(line, delimiter)
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_delimiter_is_used_verbatim() {
        let inferer = DelimiterInferer::new();
        let result = inferer.infer("a;b,c", &["x,y,z"], Some(";"));
        assert_eq!(result.columns, vec!["a", "b,c"]);
        assert_eq!(result.delimiter, ";");
        assert!(result.error.is_none());
    }

    #[test]
    fn test_detect_comma() {
        let sample = ["name,age,city", "Alice,30,NYC", "Bob,25,LA"];
        let inferer = DelimiterInferer::new();
        assert_eq!(inferer.detect(&sample), Some(","));

        let result = inferer.infer(sample[0], &sample, None);
        assert_eq!(result.columns, vec!["name", "age", "city"]);
    }

    #[test]
    fn test_detect_tab_and_pipe() {
        let inferer = DelimiterInferer::new();
        assert_eq!(inferer.detect(&["a\tb\tc", "1\t2\t3"]), Some("\t"));
        assert_eq!(inferer.detect(&["a|b|c", "1|2|3"]), Some("|"));
    }

    #[test]
    fn test_empty_sample_picks_comma() {
        let inferer = DelimiterInferer::new();
        let empty: [&str; 0] = [];
        assert_eq!(inferer.detect(&empty), Some(","));

        let result = inferer.infer("a,b", &empty, None);
        assert_eq!(result.columns, vec!["a", "b"]);
    }

    #[test]
    fn test_tie_broken_by_consistency() {
        // Comma and semicolon both occur twice; only semicolon splits evenly.
        let sample = ["a;b,,c", "d;e"];
        let inferer = DelimiterInferer::new();
        assert_eq!(inferer.detect(&sample), Some(";"));
    }

    #[test]
    fn test_tie_keeps_priority_order() {
        // Colon and pipe tie and both split evenly; colon has priority.
        let sample = ["a:b|c", "d:e|f"];
        let inferer = DelimiterInferer::new();
        assert_eq!(inferer.detect(&sample), Some(":"));
    }

    #[test]
    fn test_all_candidates_eliminated_falls_back() {
        // Comma and semicolon tie at 2 but neither splits the lines evenly.
        let sample = ["a,b,c", "d;e;f"];
        let inferer = DelimiterInferer::new();
        assert_eq!(inferer.detect(&sample), None);

        let result = inferer.infer("a,b,c", &sample, None);
        assert!(result.is_fallback());
        assert_eq!(result.columns, vec!["a,b,c"]);
        assert_eq!(result.delimiter, "");
        assert!(matches!(
            result.error,
            Some(GuapoError::NoDelimiterFound { .. })
        ));
    }

    #[test]
    fn test_split_fields_empty_delimiter() {
        assert_eq!(split_fields("a,b", ""), vec!["a,b"]);
        assert_eq!(split_fields("a,,b", ","), vec!["a", "", "b"]);
    }
}
