//! Operator-precedence parsing of formula tokens.
//!
//! Tokens are reordered into postfix form with an explicit operator stack,
//! so operand count and parenthesis nesting never grow the call stack.

use super::error::FormulaParseError;
use super::lexer::Token;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    fn from_symbol(c: char) -> Option<BinaryOp> {
        match c {
            '+' => Some(BinaryOp::Add),
            '-' => Some(BinaryOp::Sub),
            '*' => Some(BinaryOp::Mul),
            '/' => Some(BinaryOp::Div),
            _ => None,
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Sub => 1,
            BinaryOp::Mul | BinaryOp::Div => 2,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Plus,
    Minus,
}

impl UnaryOp {
    fn from_symbol(c: char) -> Option<UnaryOp> {
        match c {
            '+' => Some(UnaryOp::Plus),
            '-' => Some(UnaryOp::Minus),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            UnaryOp::Plus => '+',
            UnaryOp::Minus => '-',
        }
    }
}

/// One step of a postfix program. Operands are indices into the token slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Operand(usize),
    Unary(UnaryOp),
    Binary(BinaryOp),
}

/// Entries waiting on the operator stack.
#[derive(Clone, Copy)]
enum Pending {
    Open,
    Unary(UnaryOp),
    Binary(BinaryOp),
}

fn syntax_error(index: usize, message: &str) -> FormulaParseError {
    FormulaParseError::Syntax(format!("{} at token {}", message, index + 1))
}

/// Reorder `tokens` into postfix steps, rejecting malformed expressions.
///
/// Unary `+`/`-` bind tighter than any binary operator; binary operators
/// are left associative.
pub(crate) fn to_postfix(tokens: &[Token]) -> Result<Vec<Step>, FormulaParseError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut pending: Vec<Pending> = Vec::new();
    // True where the grammar needs an operand (start, after an operator or `(`).
    let mut expect_operand = true;

    for (index, token) in tokens.iter().enumerate() {
        match token {
            Token::Number(_) | Token::Cell { .. } => {
                if !expect_operand {
                    return Err(syntax_error(index, "missing operator before operand"));
                }
                output.push(Step::Operand(index));
                expect_operand = false;
            }
            Token::Symbol('(') => {
                if !expect_operand {
                    return Err(syntax_error(index, "missing operator before '('"));
                }
                pending.push(Pending::Open);
            }
            Token::Symbol(')') => {
                if expect_operand {
                    return Err(syntax_error(index, "missing operand before ')'"));
                }
                loop {
                    match pending.pop() {
                        Some(Pending::Open) => break,
                        Some(Pending::Unary(op)) => output.push(Step::Unary(op)),
                        Some(Pending::Binary(op)) => output.push(Step::Binary(op)),
                        None => return Err(syntax_error(index, "unmatched ')'")),
                    }
                }
            }
            Token::Symbol(c) if expect_operand => {
                let op = UnaryOp::from_symbol(*c)
                    .ok_or_else(|| syntax_error(index, &format!("missing operand before '{}'", c)))?;
                pending.push(Pending::Unary(op));
            }
            Token::Symbol(c) => {
                let op = BinaryOp::from_symbol(*c)
                    .ok_or_else(|| syntax_error(index, &format!("unexpected '{}'", c)))?;
                while let Some(&top) = pending.last() {
                    match top {
                        Pending::Unary(u) => output.push(Step::Unary(u)),
                        Pending::Binary(b) if b.precedence() >= op.precedence() => {
                            output.push(Step::Binary(b))
                        }
                        _ => break,
                    }
                    pending.pop();
                }
                pending.push(Pending::Binary(op));
                expect_operand = true;
            }
        }
    }

    if expect_operand {
        return Err(FormulaParseError::Syntax("unexpected end of formula".to_string()));
    }
    while let Some(top) = pending.pop() {
        match top {
            Pending::Open => {
                return Err(FormulaParseError::Syntax("unmatched '('".to_string()));
            }
            Pending::Unary(op) => output.push(Step::Unary(op)),
            Pending::Binary(op) => output.push(Step::Binary(op)),
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::lexer::tokenize;

    fn postfix(expr: &str) -> Result<Vec<Step>, FormulaParseError> {
        to_postfix(&tokenize(expr).unwrap())
    }

    #[test]
    fn test_precedence_and_associativity() {
        // 1 - 2 * 3 - 4  =>  1 2 3 * - 4 -
        assert_eq!(
            postfix("1 - 2 * 3 - 4").unwrap(),
            vec![
                Step::Operand(0),
                Step::Operand(2),
                Step::Operand(4),
                Step::Binary(BinaryOp::Mul),
                Step::Binary(BinaryOp::Sub),
                Step::Operand(6),
                Step::Binary(BinaryOp::Sub),
            ]
        );
    }

    #[test]
    fn test_unary_binds_tighter_than_binary() {
        // -2 * +3  =>  2 neg 3 pos *
        assert_eq!(
            postfix("-2 * +3").unwrap(),
            vec![
                Step::Operand(1),
                Step::Unary(UnaryOp::Minus),
                Step::Operand(4),
                Step::Unary(UnaryOp::Plus),
                Step::Binary(BinaryOp::Mul),
            ]
        );
    }

    #[test]
    fn test_parentheses_are_dropped() {
        assert_eq!(postfix("((((7))))").unwrap(), vec![Step::Operand(4)]);
    }

    #[test]
    fn test_malformed_token_streams() {
        for bad in ["1 +", "(1", "1)", "A1 A2", "*2", "1 2", "()", "2 (3)", "1 * / 2"] {
            assert!(
                matches!(postfix(bad), Err(FormulaParseError::Syntax(_))),
                "{bad:?} should be a syntax error"
            );
        }
    }
}
