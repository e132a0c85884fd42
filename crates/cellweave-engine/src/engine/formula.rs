//! Parsed formula handles.
//!
//! [`parse_formula`] turns expression text (without the leading `=`) into a
//! [`Formula`]: a compiled Rhai AST, the canonical expression text, and the
//! sorted list of in-bounds positions the expression reads. The AST is a flat
//! list of single-operator statements, so long formulas stay shallow.

use rhai::{AST, Dynamic, Scope};
use std::collections::BTreeSet;

use super::error::FormulaParseError;
use super::eval::{engine, literal_name, temp_name, to_cell_value};
use super::format::format_number;
use super::lexer::{Token, tokenize};
use super::parser::{Step, UnaryOp, to_postfix};
use super::position::Position;
use super::value::{CellLookup, CellValue, FormulaError};

/// A parsed formula expression.
#[derive(Clone, Debug)]
pub struct Formula {
    ast: AST,
    expression: String,
    literals: Vec<f64>,
    references: Vec<Position>,
    has_invalid_reference: bool,
}

/// Parse expression text into a [`Formula`].
pub fn parse_formula(expression: &str) -> Result<Formula, FormulaParseError> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(FormulaParseError::Empty);
    }
    let steps = to_postfix(&tokens)?;

    // Scope variable naming each operand token; `None` for operators.
    let mut operands: Vec<Option<String>> = Vec::with_capacity(tokens.len());
    let mut canonical = String::new();
    let mut literals = Vec::new();
    let mut references = BTreeSet::new();
    let mut has_invalid_reference = false;

    for token in tokens {
        match token {
            Token::Number(n) => {
                operands.push(Some(literal_name(literals.len())));
                canonical.push_str(&format_number(n));
                literals.push(n);
            }
            Token::Cell { pos: Some(pos), .. } => {
                let name = pos.to_string();
                canonical.push_str(&name);
                operands.push(Some(name));
                references.insert(pos);
            }
            Token::Cell { raw, pos: None } => {
                has_invalid_reference = true;
                canonical.push_str(&raw);
                operands.push(Some(raw));
            }
            Token::Symbol(c) => {
                canonical.push(c);
                operands.push(None);
            }
        }
    }

    let program = lower(&steps, &operands)?;
    let ast = engine()
        .compile(program)
        .map_err(|e| FormulaParseError::Syntax(e.to_string()))?;

    Ok(Formula {
        ast,
        expression: canonical,
        literals,
        references: references.into_iter().collect(),
        has_invalid_reference,
    })
}

/// Turn postfix steps into a straight-line Rhai script.
///
/// Every operator result is bound to a fresh `t{i}` variable, so each
/// statement holds at most one operator and the final statement names the
/// result. `1 + 2 * A1` becomes:
///
/// ```text
/// let t0 = n1 * A1;
/// let t1 = n0 + t0;
/// t1
/// ```
fn lower(steps: &[Step], operands: &[Option<String>]) -> Result<String, FormulaParseError> {
    let malformed = || FormulaParseError::Syntax("malformed expression".to_string());

    let mut program = String::new();
    let mut stack: Vec<String> = Vec::new();
    let mut temps = 0usize;
    let mut fresh = || {
        let name = temp_name(temps);
        temps += 1;
        name
    };

    for step in steps {
        match *step {
            Step::Operand(index) => {
                let name = operands.get(index).cloned().flatten().ok_or_else(malformed)?;
                stack.push(name);
            }
            // Unary plus leaves an f64 unchanged.
            Step::Unary(UnaryOp::Plus) => {
                if stack.is_empty() {
                    return Err(malformed());
                }
            }
            Step::Unary(op) => {
                let operand = stack.pop().ok_or_else(malformed)?;
                let target = fresh();
                program.push_str(&format!("let {} = {}{};\n", target, op.symbol(), operand));
                stack.push(target);
            }
            Step::Binary(op) => {
                let rhs = stack.pop().ok_or_else(malformed)?;
                let lhs = stack.pop().ok_or_else(malformed)?;
                let target = fresh();
                program.push_str(&format!(
                    "let {} = {} {} {};\n",
                    target,
                    lhs,
                    op.symbol(),
                    rhs
                ));
                stack.push(target);
            }
        }
    }

    let result = stack.pop().ok_or_else(malformed)?;
    if !stack.is_empty() {
        return Err(malformed());
    }
    program.push_str(&result);
    Ok(program)
}

impl Formula {
    /// Canonical expression text (no leading `=`).
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// In-bounds positions read by the formula, sorted and deduplicated.
    pub fn referenced_cells(&self) -> &[Position] {
        &self.references
    }

    /// Evaluate against the current values provided by `lookup`.
    ///
    /// Never fails: problems are reported as [`CellValue::Error`].
    pub fn evaluate(&self, lookup: &dyn CellLookup) -> CellValue {
        if self.has_invalid_reference {
            return FormulaError::Ref.into();
        }

        let mut scope = Scope::new();
        for (index, n) in self.literals.iter().enumerate() {
            scope.push_constant(literal_name(index), *n);
        }
        for pos in &self.references {
            match lookup.lookup(*pos).as_operand() {
                Ok(n) => {
                    scope.push_constant(pos.to_string(), n);
                }
                Err(e) => return e.into(),
            }
        }

        to_cell_value(engine().eval_ast_with_scope::<Dynamic>(&mut scope, &self.ast))
    }
}
