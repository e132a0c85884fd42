//! Cell data structures.
//!
//! - [`Content`] - What a cell holds: nothing, literal text, or a formula
//! - [`Cell`] - Content plus the cell's edges in the dependency graph

use std::cell::RefCell;
use std::collections::HashSet;

use cellweave_engine::{CellLookup, CellValue, Formula, FormulaParseError, Position, parse_formula};

/// Leading character that marks formula input.
pub const FORMULA_SIGN: char = '=';
/// Leading character that forces input to be treated as text.
pub const ESCAPE_SIGN: char = '\'';

/// A formula together with its memoized result.
#[derive(Debug)]
pub(crate) struct FormulaContent {
    formula: Formula,
    cache: RefCell<Option<CellValue>>,
}

/// The payload of a cell.
#[derive(Debug)]
pub(crate) enum Content {
    Empty,
    Text(String),
    Formula(FormulaContent),
}

impl Content {
    /// Build content from user input without touching any cell.
    /// - Empty string -> Empty
    /// - `=` followed by at least one character -> Formula (without the `=`)
    /// - Anything else, including a lone `=` -> Text
    pub fn from_input(text: &str) -> Result<Content, FormulaParseError> {
        if text.is_empty() {
            return Ok(Content::Empty);
        }

        match text.strip_prefix(FORMULA_SIGN) {
            Some(expression) if !expression.is_empty() => {
                Ok(Content::Formula(FormulaContent {
                    formula: parse_formula(expression)?,
                    cache: RefCell::new(None),
                }))
            }
            _ => Ok(Content::Text(text.to_string())),
        }
    }

    /// Current value. Formulas evaluate through `lookup` on a cache miss and
    /// memoize the result.
    pub fn value(&self, lookup: &dyn CellLookup) -> CellValue {
        match self {
            Content::Empty => CellValue::empty(),
            Content::Text(text) => {
                let value = text.strip_prefix(ESCAPE_SIGN).unwrap_or(text.as_str());
                CellValue::Text(value.to_string())
            }
            Content::Formula(f) => {
                if let Some(cached) = f.cache.borrow().as_ref() {
                    return cached.clone();
                }
                let value = f.formula.evaluate(lookup);
                *f.cache.borrow_mut() = Some(value.clone());
                value
            }
        }
    }

    /// Text as the user would edit it.
    pub fn text(&self) -> String {
        match self {
            Content::Empty => String::new(),
            Content::Text(text) => text.clone(),
            Content::Formula(f) => format!("{}{}", FORMULA_SIGN, f.formula.expression()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Content::Empty => true,
            Content::Text(text) => text.is_empty(),
            Content::Formula(_) => false,
        }
    }

    pub fn referenced_cells(&self) -> &[Position] {
        match self {
            Content::Formula(f) => f.formula.referenced_cells(),
            _ => &[],
        }
    }

    /// Whether a computed value is currently memoized.
    pub fn has_cache(&self) -> bool {
        match self {
            Content::Formula(f) => f.cache.borrow().is_some(),
            _ => false,
        }
    }

    pub fn invalidate_cache(&self) {
        if let Content::Formula(f) = self {
            f.cache.borrow_mut().take();
        }
    }
}

/// A cell in the sheet.
///
/// Edge sets hold positions rather than references; the sheet owns every
/// cell and keeps both directions consistent.
#[derive(Debug)]
pub(crate) struct Cell {
    pub content: Content,
    /// Cells this cell reads.
    pub referenced: HashSet<Position>,
    /// Cells that read this cell.
    pub dependents: HashSet<Position>,
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell {
            content: Content::Empty,
            referenced: HashSet::new(),
            dependents: HashSet::new(),
        }
    }

    pub fn is_referenced(&self) -> bool {
        !self.dependents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellweave_engine::FormulaError;

    struct NoCells;

    impl CellLookup for NoCells {
        fn lookup(&self, _pos: Position) -> CellValue {
            CellValue::empty()
        }
    }

    #[test]
    fn test_from_input_kinds() {
        assert!(matches!(Content::from_input("").unwrap(), Content::Empty));
        assert!(matches!(Content::from_input("=").unwrap(), Content::Text(ref s) if s == "="));
        assert!(matches!(Content::from_input("hello").unwrap(), Content::Text(_)));
        assert!(matches!(Content::from_input("=1+2").unwrap(), Content::Formula(_)));
        assert!(Content::from_input("=1+").is_err());
    }

    #[test]
    fn test_escaped_text_value_and_text() {
        let content = Content::from_input("'=not a formula").unwrap();
        assert_eq!(content.text(), "'=not a formula");
        assert_eq!(
            content.value(&NoCells),
            CellValue::Text("=not a formula".into())
        );
        assert!(content.referenced_cells().is_empty());
        assert!(!content.has_cache());
    }

    #[test]
    fn test_formula_text_is_canonical() {
        let content = Content::from_input("= A1 *( 2 )").unwrap();
        assert_eq!(content.text(), "=A1*(2)");
        assert_eq!(content.referenced_cells(), &[Position::new(0, 0)]);
    }

    #[test]
    fn test_formula_cache_fill_and_invalidate() {
        let content = Content::from_input("=1/0").unwrap();
        assert!(!content.has_cache());
        assert_eq!(
            content.value(&NoCells),
            CellValue::Error(FormulaError::Arithmetic)
        );
        assert!(content.has_cache());
        content.invalidate_cache();
        assert!(!content.has_cache());
    }
}
