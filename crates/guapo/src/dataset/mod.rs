//! Typed datasets: the table model, its builder and the open-dataset session.

mod builder;
mod session;
mod table;

pub use builder::{build, TableBuilder, UNTITLED};
pub use session::Session;
pub use table::{Column, Dataset};
