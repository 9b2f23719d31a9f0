//! Prefix-sampled numeric type classification for columns.

use serde::{Deserialize, Serialize};

use crate::config::{DATA_TYPE_SAMPLE_SIZE, TYPE_THRESHOLD};
use crate::schema::{CellValue, DataType};

/// Hit counts from sampling one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SampleCounts {
    /// Number of values actually examined.
    pub sampled: usize,
    /// Values that parsed as integers.
    pub integer_hits: usize,
    /// Values that parsed as floats but not as integers.
    pub float_hits: usize,
}

impl SampleCounts {
    /// Fraction of the sample that parsed as integers.
    pub fn integer_ratio(&self) -> f64 {
        ratio(self.integer_hits, self.sampled)
    }

    /// Fraction of the sample that parsed as floats only.
    pub fn float_ratio(&self) -> f64 {
        ratio(self.float_hits, self.sampled)
    }
}

fn ratio(hits: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

/// Classifies columns as integer-like, float-like or text from a prefix sample.
///
/// Sampling always takes the first values of the column, so results are
/// reproducible for the same input.
#[derive(Debug, Clone)]
pub struct TypeSampler {
    /// Ceiling on the number of values sampled.
    sample_size: usize,
    /// Hit ratio a numeric type must exceed.
    threshold: f64,
}

impl TypeSampler {
    /// Create a sampler with the default ceiling and threshold.
    pub fn new() -> Self {
        Self {
            sample_size: DATA_TYPE_SAMPLE_SIZE,
            threshold: TYPE_THRESHOLD,
        }
    }

    /// Create a sampler with custom settings.
    pub fn with_settings(sample_size: usize, threshold: f64) -> Self {
        Self {
            sample_size,
            threshold,
        }
    }

    /// The configured sample ceiling.
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Count integer and float hits over the first
    /// `min(sample_size, values.len() - 1)` values.
    ///
    /// A value that parses as an integer is never also counted as a float.
    pub fn classify<S: AsRef<str>>(values: &[S], sample_size: usize) -> SampleCounts {
        let take = sample_size.min(values.len().saturating_sub(1));
        let mut counts = SampleCounts {
            sampled: take,
            ..SampleCounts::default()
        };

        for value in &values[..take] {
            let value = value.as_ref();
            if CellValue::parse_integer(value).is_some() {
                counts.integer_hits += 1;
            } else if CellValue::parse_float(value).is_some() {
                counts.float_hits += 1;
            }
        }

        counts
    }

    /// Decide a column type from sample counts.
    ///
    /// A numeric type needs more than `threshold` of the sample. When a
    /// numeric type qualifies, the larger hit count wins and integers win ties.
    pub fn decide(&self, counts: &SampleCounts) -> DataType {
        if counts.sampled == 0 {
            return DataType::Text;
        }

        let integer_ok = counts.integer_ratio() > self.threshold;
        let float_ok = counts.float_ratio() > self.threshold;

        if !integer_ok && !float_ok {
            DataType::Text
        } else if counts.integer_hits >= counts.float_hits {
            DataType::Integer
        } else {
            DataType::Float
        }
    }

    /// Sample a column and decide its type in one step.
    pub fn infer_type<S: AsRef<str>>(&self, values: &[S], sample_size: usize) -> DataType {
        let counts = Self::classify(values, sample_size.min(self.sample_size));
        self.decide(&counts)
    }
}

impl Default for TypeSampler {
    fn default() -> Self {
        Self::new()
    }
}
