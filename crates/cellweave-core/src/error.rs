//! Error types for cellweave core.

use thiserror::Error;

use cellweave_engine::{FormulaParseError, Position};

/// Structural failures of sheet operations. Any operation returning one of
/// these has left the sheet unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SheetError {
    #[error("Invalid cell position: row {}, column {}", .0.row, .0.col)]
    InvalidPosition(Position),

    #[error("Circular dependency detected at {0}")]
    CircularDependency(Position),

    #[error("Formula parse error: {0}")]
    FormulaParse(#[from] FormulaParseError),
}

pub type Result<T> = std::result::Result<T, SheetError>;
