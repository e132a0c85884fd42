//! cellweave-core - Sheet model with incremental dependency tracking.

mod cell;
pub mod error;
pub mod sheet;

pub use cell::{ESCAPE_SIGN, FORMULA_SIGN};
pub use error::{Result, SheetError};
pub use sheet::{CellView, Sheet};

pub use cellweave_engine::{CellValue, FormulaError, Position, Size};
