use thiserror::Error;

/// A formula could not be parsed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaParseError {
    #[error("empty formula")]
    Empty,

    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("number out of range: {0}")]
    BadNumber(String),

    #[error("syntax error: {0}")]
    Syntax(String),
}
