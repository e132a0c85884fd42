//! Cell positions and A1 notation.
//!
//! A [`Position`] is a zero-indexed (row, column) pair. Positions can be
//! constructed freely but are only *valid* inside the sheet bounds
//! (`MAX_ROWS` x `MAX_COLS`); every sheet operation checks validity first.
//!
//! ```ignore
//! let pos: Position = "B3".parse().unwrap();
//! assert_eq!(pos.row, 2);
//! assert_eq!(pos.col, 1);
//! assert_eq!(pos.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Number of addressable rows.
pub const MAX_ROWS: usize = 16384;
/// Number of addressable columns (`A` through `XFD`).
pub const MAX_COLS: usize = 16384;

/// A cell address by row and column (0-indexed).
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Position {
        Position { row, col }
    }

    pub fn is_valid(&self) -> bool {
        self.row < MAX_ROWS && self.col < MAX_COLS
    }

    /// Parse A1 notation without checking sheet bounds.
    ///
    /// Returns `None` for malformed input or coordinates that overflow
    /// `usize`. Use [`Position::is_valid`] to check bounds afterwards.
    pub fn parse_unchecked(name: &str) -> Option<Position> {
        let caps = a1_re().captures(name)?;
        let letters = &caps["letters"];
        let numbers = &caps["numbers"];

        let mut col_acc = 0usize;
        for c in letters.bytes() {
            let digit = (c - b'A') as usize + 1;
            col_acc = col_acc.checked_mul(26)?.checked_add(digit)?;
        }
        let col = col_acc.checked_sub(1)?;
        let row = numbers.parse::<usize>().ok()?.checked_sub(1)?;

        Some(Position::new(row, col))
    }

    /// Convert column index to letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col as u128 + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

fn a1_re() -> &'static Regex {
    static A1_RE: OnceLock<Regex> = OnceLock::new();
    A1_RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Z]+)(?<numbers>[0-9]+)$").expect("A1 regex must compile")
    })
}

/// Error returned when text is not a valid in-bounds A1 reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid cell position: {0}")]
pub struct ParsePositionError(pub String);

impl std::str::FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_unchecked(s)
            .filter(Position::is_valid)
            .ok_or_else(|| ParsePositionError(s.to_string()))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Position::col_to_letters(self.col), self.row + 1)
    }
}

/// Dimensions of the printable area of a sheet.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub rows: usize,
    pub cols: usize,
}
