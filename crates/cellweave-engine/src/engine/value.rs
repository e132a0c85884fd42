//! Cell values and formula evaluation errors.

use std::fmt;

use super::format::format_number;
use super::position::Position;

/// Category of a formula evaluation error.
///
/// These are data, not failures: a formula that divides by zero stores
/// `#ARITHM!` as its value and any formula reading it gets the same error.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FormulaError {
    /// Reference to a position outside the sheet.
    Ref,
    /// Operand cannot be interpreted as a number.
    Value,
    /// Arithmetic produced a non-finite result.
    Arithmetic,
}

impl FormulaError {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormulaError::Ref => "#REF!",
            FormulaError::Value => "#VALUE!",
            FormulaError::Arithmetic => "#ARITHM!",
        }
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The value of a cell as seen by readers.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Error(FormulaError),
}

impl CellValue {
    pub fn empty() -> CellValue {
        CellValue::Text(String::new())
    }

    /// Interpret the value as a formula operand.
    ///
    /// Empty text counts as zero, other text must parse entirely as a finite
    /// number, and errors pass through untouched.
    pub fn as_operand(&self) -> Result<f64, FormulaError> {
        match self {
            CellValue::Number(n) => Ok(*n),
            CellValue::Error(e) => Err(*e),
            CellValue::Text(s) if s.is_empty() => Ok(0.0),
            CellValue::Text(s) => s
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or(FormulaError::Value),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Error(e) => e.fmt(f),
        }
    }
}

impl From<FormulaError> for CellValue {
    fn from(e: FormulaError) -> Self {
        CellValue::Error(e)
    }
}

/// Read access to other cells' values during formula evaluation.
///
/// Implementors return the current value at `pos`; missing cells should be
/// reported as [`CellValue::empty`].
pub trait CellLookup {
    fn lookup(&self, pos: Position) -> CellValue;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_operand_conversions() {
        assert_eq!(CellValue::empty().as_operand(), Ok(0.0));
        assert_eq!(CellValue::Number(2.5).as_operand(), Ok(2.5));
        assert_eq!(CellValue::Text("12".into()).as_operand(), Ok(12.0));
        assert_eq!(
            CellValue::Text("12 apples".into()).as_operand(),
            Err(FormulaError::Value)
        );
        assert_eq!(
            CellValue::Text("inf".into()).as_operand(),
            Err(FormulaError::Value)
        );
        assert_eq!(
            CellValue::Error(FormulaError::Ref).as_operand(),
            Err(FormulaError::Ref)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Number(8.0).to_string(), "8");
        assert_eq!(CellValue::Number(0.5).to_string(), "0.5");
        assert_eq!(CellValue::Text("hi".into()).to_string(), "hi");
        assert_eq!(CellValue::Error(FormulaError::Arithmetic).to_string(), "#ARITHM!");
    }
}
