//! Raw text input and delimiter inference.

mod delimiter;
mod source;

pub use delimiter::{split_fields, DelimiterInference, DelimiterInferer};
pub use source::{lines_from_str, read_lines, SourceMetadata};
