//! Column type model: data types, formats and typed cells.

mod cell;
mod types;

pub(crate) use cell::float_to_integer;
pub use cell::CellValue;
pub use types::{DataFormat, DataType};
