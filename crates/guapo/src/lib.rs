//! Guapo: tabular ingestion and column transformation engine.
//!
//! Guapo turns raw delimited text into a typed, mutable table and cleans it
//! column by column.
//!
//! - **Ingestion**: the field delimiter is inferred from a few sample lines,
//!   and every column is classified as integer, float or text from a prefix
//!   sample of its values.
//! - **Typed columns**: each column carries a declared [`DataType`] that
//!   decides which operators may run on it.
//! - **Operators**: string cleaning for text columns, arithmetic and clamping
//!   (preview, then commit) for numeric columns.
//! - **Operation log**: every applied operation is appended to the dataset's
//!   log. There is no undo.
//!
//! # Example
//!
//! ```
//! use guapo::transform::{self, ArithmeticOp, WhitespaceMode};
//! use guapo::{build, CellValue, DataType};
//!
//! let lines = [
//!     "Country,Area,Population,Capital",
//!     "Brazil,8515767,212000000,Brasilia",
//!     "Chile,756102,19000000,Santiago",
//! ];
//! let mut dataset = build(&lines, None, true).unwrap();
//! assert_eq!(dataset.column_type(1).unwrap(), DataType::Integer);
//!
//! transform::remove_whitespace(&mut dataset, 3, WhitespaceMode::Both).unwrap();
//!
//! let preview = transform::arithmetic(&dataset, 1, ArithmeticOp::Add, 5.0).unwrap();
//! transform::commit(&mut dataset, preview).unwrap();
//! assert_eq!(dataset.get(1, 1), Some(&CellValue::Integer(756107)));
//! assert_eq!(dataset.log().len(), 2);
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod inference;
pub mod input;
pub mod schema;
pub mod transform;

pub use config::{BuildOptions, GuapoConfig, RowPolicy};
pub use dataset::{build, Dataset, Session, TableBuilder};
pub use error::{CellError, ErrorKind, GuapoError, Result};
pub use input::{read_lines, DelimiterInferer, SourceMetadata};
pub use inference::TypeSampler;
pub use schema::{CellValue, DataFormat, DataType};
pub use transform::{OperationLog, OperationLogEntry, TransformEngine, TransformOperation};
