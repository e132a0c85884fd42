//! Formula tokenizer.
//!
//! Splits formula text into numbers, cell references, operators and
//! parentheses. Structure is not checked here; that happens when the token
//! stream is compiled (see [`super::formula`]).

use regex::Regex;
use std::sync::OnceLock;

use super::error::FormulaParseError;
use super::position::Position;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    /// A cell reference. `pos` is `None` when the reference is syntactically
    /// fine but does not name a position inside the sheet.
    Cell { raw: String, pos: Option<Position> },
    Symbol(char),
}

fn token_re() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        Regex::new(
            r"^(?:(?<number>(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)|(?<cell>[A-Z]+[0-9]+)|(?<symbol>[-+*/()]))",
        )
        .expect("formula token regex must compile")
    })
}

pub(crate) fn tokenize(expression: &str) -> Result<Vec<Token>, FormulaParseError> {
    let mut tokens = Vec::new();
    let mut offset = 0;

    while offset < expression.len() {
        let rest = &expression[offset..];
        let trimmed = rest.trim_start();
        if trimmed.is_empty() {
            break;
        }
        offset += rest.len() - trimmed.len();

        let Some(caps) = token_re().captures(trimmed) else {
            let ch = trimmed.chars().next().unwrap_or_default();
            return Err(FormulaParseError::UnexpectedChar { ch, offset });
        };

        if let Some(m) = caps.name("number") {
            let n = m
                .as_str()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| FormulaParseError::BadNumber(m.as_str().to_string()))?;
            tokens.push(Token::Number(n));
        } else if let Some(m) = caps.name("cell") {
            let raw = m.as_str().to_string();
            let pos = Position::parse_unchecked(&raw).filter(Position::is_valid);
            tokens.push(Token::Cell { raw, pos });
        } else if let Some(m) = caps.name("symbol") {
            tokens.push(Token::Symbol(m.as_str().chars().next().unwrap_or_default()));
        }

        offset += caps.get(0).map_or(0, |m| m.len());
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_mixed_expression() {
        let tokens = tokenize(" A1 + 2.5*(B10- .5)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Cell { raw: "A1".into(), pos: Some(Position::new(0, 0)) },
                Token::Symbol('+'),
                Token::Number(2.5),
                Token::Symbol('*'),
                Token::Symbol('('),
                Token::Cell { raw: "B10".into(), pos: Some(Position::new(9, 1)) },
                Token::Symbol('-'),
                Token::Number(0.5),
                Token::Symbol(')'),
            ]
        );
    }

    #[test]
    fn test_tokenize_exponent_numbers() {
        assert_eq!(tokenize("2e3").unwrap(), vec![Token::Number(2000.0)]);
        assert_eq!(tokenize("1.5E-1").unwrap(), vec![Token::Number(0.15)]);
    }

    #[test]
    fn test_out_of_bounds_reference_keeps_raw_text() {
        let tokens = tokenize("ZZZZ1").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Cell { raw: "ZZZZ1".into(), pos: None }]
        );
    }

    #[test]
    fn test_unexpected_character_reports_offset() {
        assert_eq!(
            tokenize("1 + x"),
            Err(FormulaParseError::UnexpectedChar { ch: 'x', offset: 4 })
        );
        assert!(tokenize("a1").is_err());
    }

    #[test]
    fn test_overflowing_literal_is_rejected() {
        assert!(matches!(
            tokenize("1e400"),
            Err(FormulaParseError::BadNumber(_))
        ));
    }
}
