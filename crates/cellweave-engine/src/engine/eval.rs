//! Rhai engine and result mapping.
//!
//! Formulas are lowered to straight-line Rhai scripts in which every operand
//! is a variable (cell references keep their A1 name, literals become `n0`,
//! `n1`, ...) and every intermediate result gets a `t{i}` binding.
//! Evaluation binds the operands as `f64` scope constants, so Rhai only ever
//! performs floating-point arithmetic.

use rhai::{Dynamic, Engine, EvalAltResult};
use std::sync::OnceLock;

use super::value::{CellValue, FormulaError};

/// Shared engine used by every [`super::Formula`].
pub(crate) fn engine() -> &'static Engine {
    static ENGINE: OnceLock<Engine> = OnceLock::new();
    ENGINE.get_or_init(Engine::new)
}

/// Name of the scope variable holding the `index`-th numeric literal.
pub(crate) fn literal_name(index: usize) -> String {
    format!("n{}", index)
}

/// Name of the `index`-th intermediate result in a lowered formula.
pub(crate) fn temp_name(index: usize) -> String {
    format!("t{}", index)
}

/// Convert the outcome of a Rhai evaluation into a cell value.
pub(crate) fn to_cell_value(result: Result<Dynamic, Box<EvalAltResult>>) -> CellValue {
    match result {
        Ok(value) => {
            let n = value
                .as_float()
                .or_else(|_| value.as_int().map(|i| i as f64));
            match n {
                Ok(n) if n.is_finite() => CellValue::Number(n),
                Ok(_) => CellValue::Error(FormulaError::Arithmetic),
                Err(_) => CellValue::Error(FormulaError::Value),
            }
        }
        Err(err) => match *err {
            EvalAltResult::ErrorArithmetic(..) => CellValue::Error(FormulaError::Arithmetic),
            _ => CellValue::Error(FormulaError::Value),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_cell_value_maps_non_finite_to_arithmetic() {
        let inf = engine().eval_expression::<Dynamic>("1.0 / 0.0");
        assert_eq!(to_cell_value(inf), CellValue::Error(FormulaError::Arithmetic));
    }

    #[test]
    fn test_to_cell_value_accepts_integers() {
        let int = engine().eval_expression::<Dynamic>("40 + 2");
        assert_eq!(to_cell_value(int), CellValue::Number(42.0));
    }

    #[test]
    fn test_to_cell_value_rejects_non_numbers() {
        let text = engine().eval_expression::<Dynamic>("\"x\"");
        assert_eq!(to_cell_value(text), CellValue::Error(FormulaError::Value));
    }
}
