//! cellweave_engine - Formula parsing and evaluation for cellweave sheets.

pub mod engine;

pub use engine::{
    CellLookup, CellValue, Formula, FormulaError, FormulaParseError, MAX_COLS, MAX_ROWS, Position,
    Size, parse_formula,
};
