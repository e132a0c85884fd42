//! Formula engine API.
//!
//! - [`Position`], [`Size`] - Cell addressing and A1 notation
//! - [`parse_formula`], [`Formula`] - Parse and evaluate formula expressions
//! - [`CellValue`], [`FormulaError`] - Values produced by cells and formulas
//! - [`CellLookup`] - How formulas read other cells
//! - [`format_number`] - Number display

mod error;
mod eval;
mod format;
mod formula;
mod lexer;
mod parser;
mod position;
mod value;

pub use error::FormulaParseError;
pub use format::format_number;
pub use formula::{Formula, parse_formula};
pub use position::{MAX_COLS, MAX_ROWS, ParsePositionError, Position, Size};
pub use value::{CellLookup, CellValue, FormulaError};
